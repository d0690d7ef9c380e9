use futures::stream::StreamExt;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, BufReader};
use tokio_stream::wrappers::LinesStream;
use tracing::{error, info, warn};

/// Prefix of the header line in a sales file
const HEADER_PREFIX: &str = "TransactionID";

/// Read the data lines of a sales file.
///
/// The file is read as UTF-8; if it is not valid UTF-8 it is decoded as
/// Latin-1 instead. Blank lines and the header are dropped and every line is
/// trimmed. A missing or unreadable file is logged and yields no lines.
pub async fn read_sales_data(file_path: &Path) -> Vec<String> {
    match read_utf8_lines(file_path).await {
        Ok(lines) => clean_lines(lines),
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            warn!("{:?} is not valid UTF-8, falling back to Latin-1", file_path);
            match tokio::fs::read(file_path).await {
                Ok(bytes) => clean_lines(decode_latin1(&bytes).lines().map(str::to_string)),
                Err(e) => {
                    error!("Failed to read {:?}: {}", file_path, e);
                    Vec::new()
                }
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            error!("File {:?} not found", file_path);
            Vec::new()
        }
        Err(e) => {
            error!("Failed to read {:?}: {}", file_path, e);
            Vec::new()
        }
    }
}

async fn read_utf8_lines(file_path: &Path) -> std::io::Result<Vec<String>> {
    let file = File::open(file_path).await?;
    let mut lines = create_line_stream(BufReader::new(file));

    let mut collected = Vec::new();
    while let Some(line) = lines.next().await {
        collected.push(line?);
    }
    info!("Read {} lines from {:?}", collected.len(), file_path);
    Ok(collected)
}

/// Create a stream of text lines from a reader
fn create_line_stream<R: AsyncRead + Unpin>(
    reader: BufReader<R>,
) -> impl futures::Stream<Item = Result<String, std::io::Error>> {
    LinesStream::new(tokio::io::AsyncBufReadExt::lines(reader))
}

/// Every byte maps to the Unicode code point of the same value
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn clean_lines<I: IntoIterator<Item = String>>(lines: I) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty() && !line.starts_with(HEADER_PREFIX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::write;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_sales_data() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("sales.txt");
        let content = "TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region\n\
                       T001|2024-12-01|P101|Laptop|2|45000|C001|North\n\
                       \n\
                       \x20\x20T002|2024-12-01|P102|Mouse|1|500|C002|South\x20\x20\r\n";
        write(&file_path, content).unwrap();

        let lines = read_sales_data(&file_path).await;
        assert_eq!(
            lines,
            vec![
                "T001|2024-12-01|P101|Laptop|2|45000|C001|North".to_string(),
                "T002|2024-12-01|P102|Mouse|1|500|C002|South".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_read_sales_data_latin1_fallback() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("latin1.txt");
        // "Café" with é encoded as a single Latin-1 byte
        let mut content = b"T001|2024-12-01|P101|Caf".to_vec();
        content.push(0xE9);
        content.extend_from_slice(b"|1|100|C001|North\n");
        write(&file_path, content).unwrap();

        let lines = read_sales_data(&file_path).await;
        assert_eq!(lines, vec!["T001|2024-12-01|P101|Café|1|100|C001|North".to_string()]);
    }

    #[tokio::test]
    async fn test_read_sales_data_missing_file() {
        let dir = tempdir().unwrap();
        let lines = read_sales_data(&dir.path().join("missing.txt")).await;
        assert!(lines.is_empty());
    }

    #[test]
    fn test_clean_lines() {
        let lines = vec![
            "TransactionID|Date".to_string(),
            "   ".to_string(),
            " T001|x ".to_string(),
        ];
        assert_eq!(clean_lines(lines), vec!["T001|x".to_string()]);
    }
}
