//! Brand metadata: the per-brand station counts list, the positional brand
//! column, and the logo key used by the map tooltip.

use petrodash_core::{BrandCount, PetroError, PetroResult};
use serde::Deserialize;
use std::io::Read;
use tracing::{debug, warn};

const UNKNOWN_BRAND: &str = "Marque inconnue";
const NO_BRAND: &str = "No Brand";

/// Logo file aliases applied after normalisation.
const LOGO_ALIASES: &[(&str, &str)] = &[
    ("nobrand", "autre"),
    ("totalenergies", "total"),
    ("totalenergiesaccess", "totalaccess"),
    ("marqueinconnue", "autre"),
    ("supermarchesspar", "spar"),
    ("supercasino", "supermarchecasino"),
    ("intermarchecontact", "intermarche"),
    ("e.leclerc", "eleclerc"),
];

#[derive(Deserialize)]
struct BrandLine {
    name: String,
    nb_stations: u64,
}

/// Decode bytes as UTF-8, falling back to Latin-1.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// Rewrite a dict literal using single-quoted strings into JSON.
fn dict_literal_to_json(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            None => {
                if c == '\'' || c == '"' {
                    quote = Some(c);
                    out.push('"');
                } else {
                    out.push(c);
                }
            }
            Some(q) => {
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        match next {
                            '\'' => out.push('\''),
                            '"' => out.push_str("\\\""),
                            other => {
                                out.push('\\');
                                out.push(other);
                            }
                        }
                    }
                } else if c == q {
                    quote = None;
                    out.push('"');
                } else if c == '"' {
                    out.push_str("\\\"");
                } else {
                    out.push(c);
                }
            }
        }
    }
    out
}

/// Parse `brand.txt`: one `{'name': .., 'nb_stations': ..}` entry per line.
pub fn read_brand_list<R: Read>(mut reader: R) -> PetroResult<Vec<BrandCount>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = decode(bytes);

    let mut brands = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry: BrandLine = serde_json::from_str(line)
            .or_else(|_| serde_json::from_str(&dict_literal_to_json(line)))
            .map_err(|e| {
                PetroError::Dataset(format!("brand list line {}: {}", lineno + 1, e))
            })?;
        brands.push(BrandCount {
            name: entry.name,
            stations: entry.nb_stations,
        });
    }

    debug!(brands = brands.len(), "Parsed brand list");
    Ok(brands)
}

/// Read the `brand` column of `brand.csv`, one entry per station row.
pub fn read_brand_column<R: Read>(reader: R) -> PetroResult<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let idx = headers
        .iter()
        .position(|h| h.trim() == "brand")
        .ok_or_else(|| PetroError::MissingColumn("brand".to_string()))?;

    let mut brands = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let raw = record.get(idx).unwrap_or("").trim();
        if raw.is_empty() {
            warn!(row = brands.len(), "Empty brand, using placeholder");
        }
        brands.push(display_brand(raw));
    }
    Ok(brands)
}

/// Brand name as shown to users.
pub fn display_brand(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw == UNKNOWN_BRAND {
        NO_BRAND.to_string()
    } else {
        raw.to_string()
    }
}

/// File stem of the brand logo image.
pub fn brand_logo_key(brand: &str) -> String {
    let key: String = brand
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| match c {
            'à' => 'a',
            'é' | 'è' => 'e',
            other => other,
        })
        .collect::<String>()
        .to_lowercase();

    LOGO_ALIASES
        .iter()
        .find(|(from, _)| *from == key)
        .map(|(_, to)| to.to_string())
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_list_dict_literals() {
        let text = "{'name': 'TotalEnergies', 'nb_stations': 3170}\n\
                    {'name': \"Intermarché\", 'nb_stations': 1780}\n\
                    \n\
                    {\"name\": \"Esso\", \"nb_stations\": 12}\n";
        let brands = read_brand_list(text.as_bytes()).unwrap();
        assert_eq!(brands.len(), 3);
        assert_eq!(brands[0].name, "TotalEnergies");
        assert_eq!(brands[0].stations, 3170);
        assert_eq!(brands[1].name, "Intermarché");
        assert_eq!(brands[2].stations, 12);
    }

    #[test]
    fn test_brand_list_apostrophe_escape() {
        let text = "{'name': 'Relais de l\\'Ouest', 'nb_stations': 4}";
        let brands = read_brand_list(text.as_bytes()).unwrap();
        assert_eq!(brands[0].name, "Relais de l'Ouest");
    }

    #[test]
    fn test_brand_list_latin1() {
        let mut bytes = b"{'name': 'Intermarch".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"', 'nb_stations': 7}");
        let brands = read_brand_list(bytes.as_slice()).unwrap();
        assert_eq!(brands[0].name, "Intermarché");
    }

    #[test]
    fn test_brand_list_rejects_garbage() {
        let err = read_brand_list("not a dict".as_bytes()).unwrap_err();
        assert!(matches!(err, PetroError::Dataset(msg) if msg.contains("line 1")));
    }

    #[test]
    fn test_brand_column() {
        let csv = "id,brand\n1,Total\n2,Marque inconnue\n3,\n";
        let brands = read_brand_column(csv.as_bytes()).unwrap();
        assert_eq!(brands, vec!["Total", "No Brand", "No Brand"]);
    }

    #[test]
    fn test_logo_keys() {
        assert_eq!(brand_logo_key("TotalEnergies Access"), "totalaccess");
        assert_eq!(brand_logo_key("TotalEnergies"), "total");
        assert_eq!(brand_logo_key("No Brand"), "autre");
        assert_eq!(brand_logo_key("Intermarché Contact"), "intermarche");
        assert_eq!(brand_logo_key("E.Leclerc"), "eleclerc");
        assert_eq!(brand_logo_key("Carrefour Market"), "carrefourmarket");
        assert_eq!(brand_logo_key("Supermarchés Spar"), "spar");
    }
}
