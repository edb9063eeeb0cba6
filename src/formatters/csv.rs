use crate::error::Result;
use crate::types::ParsedName;

pub const HEADER: [&str; 7] = [
    "id",
    "verbatim",
    "canonical",
    "canonical_ranked",
    "authorship",
    "year",
    "quality",
];

/// One header row plus one row per name, RFC 4180 quoting.
///
/// # Errors
/// Returns an error if a record cannot be written.
pub fn format(names: &[ParsedName]) -> Result<String> {
    let mut wtr = ::csv::Writer::from_writer(Vec::new());
    wtr.write_record(HEADER)?;
    for n in names {
        push_row(&mut wtr, n)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| ::csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn push_row(wtr: &mut ::csv::Writer<Vec<u8>>, n: &ParsedName) -> Result<()> {
    let canonical = n.canonical_name.as_ref();
    let quality = n.quality.to_string();
    wtr.write_record([
        n.name_string_id.as_str(),
        n.verbatim.as_str(),
        canonical.map_or("", |c| c.value.as_str()),
        canonical.map_or("", |c| c.value_ranked.as_str()),
        n.authorship().map_or("", |a| a.value.as_str()),
        n.year().map_or("", |y| y.value.as_str()),
        quality.as_str(),
    ])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScientificNameParser;

    #[test]
    fn header_and_quoted_rows() {
        let p = ScientificNameParser::new();
        let names = vec![
            p.from_string("Homo sapiens L."),
            p.from_string("Aus bus Smith, 1900"),
            p.from_string("Tobacco mosaic virus"),
        ];
        let s = format(&names).unwrap();
        let mut lines = s.lines();
        assert_eq!(
            lines.next(),
            Some("id,verbatim,canonical,canonical_ranked,authorship,year,quality")
        );
        let row = lines.next().unwrap();
        assert!(row.ends_with(",Homo sapiens L.,Homo sapiens,Homo sapiens,L.,,1"));
        let row = lines.next().unwrap();
        assert!(row.contains(",\"Aus bus Smith, 1900\",Aus bus,Aus bus,Smith 1900,1900,1"));
        let row = lines.next().unwrap();
        assert!(row.ends_with(",Tobacco mosaic virus,,,,,0"));
        assert!(lines.next().is_none());
    }
}
