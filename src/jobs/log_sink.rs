use std::path::Path;

use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use super::JobResult;

/// Appends each line plus a newline, creating the file on first use.
pub async fn append_lines(path: &Path, lines: &[String]) -> JobResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    for line in lines {
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
    }
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_without_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");

        append_lines(&path, &["first".to_string()]).await.unwrap();
        append_lines(&path, &["second".to_string(), "third".to_string()])
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\nthird\n");
    }
}
