//! Common routines for reading input files.
use crate::network::InvestmentEdge;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read a series of type Ts from a CSV file into a Vec<T>.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_vec_from_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?;
    let vec: Vec<T> = reader
        .deserialize::<T>()
        .try_collect()
        .with_context(|| input_err_msg(file_path))?;
    ensure!(!vec.is_empty(), "CSV file {} cannot be empty", file_path.display());

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;

    Ok(toml_data)
}

/// Read investments between countries from a CSV file.
///
/// The file must have the columns `source_country`, `target_country`, `investment_amount` and
/// `sector`. Investment amounts must be non-negative numbers.
pub fn read_investment_edges(file_path: &Path) -> Result<Vec<InvestmentEdge>> {
    let edges: Vec<InvestmentEdge> = read_vec_from_csv(file_path)?;
    for edge in &edges {
        ensure!(
            edge.investment_amount >= 0.0,
            "Investment from {} to {} has an invalid amount ({}): must be a non-negative number",
            edge.source_country,
            edge.target_country,
            edge.investment_amount
        );
    }

    Ok(edges)
}

/// Format an error message for when reading from a file fails
fn input_err_msg(file_path: &Path) -> String {
    format!("Error reading {}", file_path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;
    use serde::Deserialize;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Record {
        id: String,
        value: u32,
    }

    /// Create a file with the given contents in `dir_path`
    fn create_file(dir_path: &Path, file_name: &str, contents: &str) -> PathBuf {
        let file_path = dir_path.join(file_name);
        let mut file = File::create(&file_path).unwrap();
        write!(file, "{contents}").unwrap();
        file_path
    }

    #[test]
    fn test_read_vec_from_csv() {
        let dir = tempdir().unwrap();
        let file_path = create_file(dir.path(), "test.csv", "id,value\nhello, 1\nworld,2\n");
        let records: Vec<Record> = read_vec_from_csv(&file_path).unwrap();
        assert_eq!(
            records,
            [
                Record {
                    id: "hello".into(),
                    value: 1,
                },
                Record {
                    id: "world".into(),
                    value: 2,
                }
            ]
        );
    }

    #[test]
    fn test_read_vec_from_csv_empty() {
        let dir = tempdir().unwrap();
        let file_path = create_file(dir.path(), "test.csv", "id,value\n");
        assert!(read_vec_from_csv::<Record>(&file_path).is_err());
    }

    #[test]
    fn test_read_toml() {
        let dir = tempdir().unwrap();
        let file_path = create_file(dir.path(), "test.toml", "id = \"hello\"\nvalue = 1\n");
        assert_eq!(
            read_toml::<Record>(&file_path).unwrap(),
            Record {
                id: "hello".into(),
                value: 1
            }
        );

        let bad_path = create_file(dir.path(), "bad.toml", "id = \n");
        assert!(read_toml::<Record>(&bad_path).is_err());
    }

    #[test]
    fn test_read_investment_edges() {
        let dir = tempdir().unwrap();
        let file_path = create_file(
            dir.path(),
            "edges.csv",
            "source_country,target_country,investment_amount,sector
USA,China,150,Technology
China,USA,120.5,Technology
",
        );
        let edges = read_investment_edges(&file_path).unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(
            edges[1],
            InvestmentEdge {
                source_country: "China".into(),
                target_country: "USA".into(),
                investment_amount: 120.5,
                sector: "Technology".into(),
            }
        );
    }

    #[rstest]
    #[case("-1", "-1")]
    #[case("NaN", "NaN")]
    fn test_read_investment_edges_invalid_amount(#[case] amount: &str, #[case] shown: &str) {
        let dir = tempdir().unwrap();
        let file_path = create_file(
            dir.path(),
            "edges.csv",
            &format!(
                "source_country,target_country,investment_amount,sector\nUSA,China,{amount},Technology\n"
            ),
        );
        assert_error!(
            read_investment_edges(&file_path),
            format!(
                "Investment from USA to China has an invalid amount ({shown}): must be a \
                 non-negative number"
            )
        );
    }
}
