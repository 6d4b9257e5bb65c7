//! HTTP downloads with live block-hosted progress.
//!
//! Single-stream downloads drive a [`BlockBar`] as bytes arrive. When
//! the server advertises byte-range support and a known length, the
//! transfer is split across several connections instead: each range
//! lands in its own `.part` file, the parts are concatenated in order
//! and removed.

use std::path::{Path, PathBuf};
use std::time::Instant;

use reqwest::header::{ACCEPT_RANGES, CONTENT_RANGE, RANGE};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;
use tracing::info;
use url::Url;

use crate::fmt::{format_seconds, format_size, format_speed};
use crate::printer::PrinterError;
use crate::progress::{BarStyle, BlockBar};

/// Fallback file name when the URL path has no usable last segment.
const DEFAULT_FILE_NAME: &str = "download";

/// Errors raised while fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Local file I/O failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Progress display failed
    #[error("progress display failed: {0}")]
    Printer(#[from] PrinterError),

    /// The URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A ranged download task died before reporting back
    #[error("download task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// What a [`probe`] learned about a remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteInfo {
    /// Total size in bytes; zero when the server did not say.
    pub content_length: u64,
    /// Whether byte-range requests are supported.
    pub accepts_ranges: bool,
}

/// Options for [`download`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Directory the file is saved into. Created if missing.
    pub dir: PathBuf,
    /// Explicit file name; derived from the URL path when absent.
    pub file_name: Option<String>,
    /// Connection count for ranged downloads.
    pub connections: usize,
    /// Whether to show a block-hosted progress bar.
    pub progress: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            file_name: None,
            connections: 5,
            progress: true,
        }
    }
}

/// Ask the server about a resource's size and range support.
///
/// Tries a HEAD request first. Some servers omit `Accept-Ranges` or
/// `Content-Length` there, so a one-byte range GET is used as a
/// fallback: a 206 response proves range support and its
/// `Content-Range` total carries the full length.
pub async fn probe(client: &Client, url: &str) -> Result<RemoteInfo, FetchError> {
    let head = client.head(url).send().await?;
    let mut accepts_ranges = head
        .headers()
        .get(ACCEPT_RANGES)
        .is_some_and(|value| value.as_bytes() == b"bytes");
    let mut content_length = head
        .headers()
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0);

    if !accepts_ranges || content_length == 0 {
        let response = client.get(url).header(RANGE, "bytes=0-0").send().await?;
        if response.status() == StatusCode::PARTIAL_CONTENT {
            accepts_ranges = true;
            let total = response
                .headers()
                .get(CONTENT_RANGE)
                .and_then(|value| value.to_str().ok())
                .and_then(content_range_total);
            if let Some(total) = total {
                content_length = total;
            }
        }
    }

    Ok(RemoteInfo {
        content_length,
        accepts_ranges,
    })
}

/// Download `url` into the configured directory.
///
/// Returns the path of the finished file.
pub async fn download(url: &str, config: &FetchConfig) -> Result<PathBuf, FetchError> {
    let client = Client::new();
    let info = probe(&client, url).await?;

    tokio::fs::create_dir_all(&config.dir).await?;
    let name = match &config.file_name {
        Some(name) => name.clone(),
        None => file_name_from_url(url)?,
    };
    let dest = config.dir.join(&name);

    let started = Instant::now();
    if info.accepts_ranges && info.content_length > 0 && config.connections > 1 {
        info!(
            url,
            path = %dest.display(),
            connections = config.connections,
            "downloading with ranged connections"
        );
        download_ranged(&client, url, &dest, info.content_length, config.connections).await?;
    } else {
        info!(url, path = %dest.display(), "downloading");
        download_stream(&client, url, &dest, info.content_length, config.progress).await?;
    }

    let written = tokio::fs::metadata(&dest).await?.len();
    info!(
        path = %dest.display(),
        size = %format_size(written),
        speed = %format_speed(written, started.elapsed()),
        took = %format_seconds(started.elapsed().as_secs_f64()),
        "download complete"
    );
    Ok(dest)
}

/// Single-connection streaming download with optional progress bar.
async fn download_stream(
    client: &Client,
    url: &str,
    dest: &Path,
    known_length: u64,
    progress: bool,
) -> Result<(), FetchError> {
    let mut response = client.get(url).send().await?.error_for_status()?;
    let total = if known_length > 0 {
        known_length
    } else {
        response.content_length().unwrap_or(0)
    };

    let mut bar = if progress {
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
        let desc = format!("{} ({})\n\t", name, format_size(total));
        Some(BlockBar::with_style(total, BarStyle::new().desc(desc))?)
    } else {
        None
    };

    let mut file = tokio::fs::File::create(dest).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        if let Some(bar) = bar.as_mut() {
            bar.update(chunk.len() as u64)?;
        }
    }
    file.flush().await?;

    if let Some(mut bar) = bar {
        bar.close()?;
    }
    Ok(())
}

/// Ranged download across several connections.
///
/// Parts are written as `<dest>.part1`, `<dest>.part2`, ... then
/// concatenated in order and deleted.
async fn download_ranged(
    client: &Client,
    url: &str,
    dest: &Path,
    total: u64,
    connections: usize,
) -> Result<(), FetchError> {
    let ranges = part_ranges(total, connections);

    let mut tasks = JoinSet::new();
    for (index, (start, end)) in ranges.iter().copied().enumerate() {
        let client = client.clone();
        let url = url.to_string();
        let part = part_path(dest, index + 1);
        tasks.spawn(async move {
            download_part(&client, &url, &part, start, end)
                .await
                .map(|()| (index, part))
        });
    }

    let mut parts: Vec<(usize, PathBuf)> = Vec::with_capacity(ranges.len());
    while let Some(joined) = tasks.join_next().await {
        parts.push(joined??);
    }
    parts.sort_by_key(|(index, _)| *index);

    let mut out = tokio::fs::File::create(dest).await?;
    for (_, part) in &parts {
        let mut input = tokio::fs::File::open(part).await?;
        tokio::io::copy(&mut input, &mut out).await?;
    }
    out.flush().await?;

    for (_, part) in &parts {
        tokio::fs::remove_file(part).await?;
    }
    Ok(())
}

/// Stream one byte range into its part file.
async fn download_part(
    client: &Client,
    url: &str,
    part: &Path,
    start: u64,
    end: u64,
) -> Result<(), FetchError> {
    let mut response = client
        .get(url)
        .header(RANGE, format!("bytes={start}-{end}"))
        .send()
        .await?
        .error_for_status()?;

    let mut file = tokio::fs::File::create(part).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}

/// Split `total` bytes into up to `connections` inclusive ranges.
fn part_ranges(total: u64, connections: usize) -> Vec<(u64, u64)> {
    let connections = connections.max(1) as u64;
    let span = total.div_ceil(connections);
    let mut ranges = Vec::new();
    let mut start = 0;
    while start < total {
        let end = (start + span).min(total) - 1;
        ranges.push((start, end));
        start = end + 1;
    }
    ranges
}

/// Total length from a `Content-Range` header value such as
/// `bytes 0-0/10494470`. An unknown total (`*`) yields `None`.
fn content_range_total(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.parse().ok()
}

/// Last path segment of the URL, ignoring query and fragment.
fn file_name_from_url(url: &str) -> Result<String, FetchError> {
    let parsed = Url::parse(url)?;
    let name = parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME);
    Ok(name.to_string())
}

fn part_path(dest: &Path, index: usize) -> PathBuf {
    PathBuf::from(format!("{}.part{index}", dest.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_ranges_cover_everything_once() {
        let ranges = part_ranges(100, 4);
        assert_eq!(ranges, vec![(0, 24), (25, 49), (50, 74), (75, 99)]);

        let covered: u64 = ranges.iter().map(|(s, e)| e - s + 1).sum();
        assert_eq!(covered, 100);
    }

    #[test]
    fn test_part_ranges_uneven_split() {
        let ranges = part_ranges(10, 3);
        assert_eq!(ranges, vec![(0, 3), (4, 7), (8, 9)]);
    }

    #[test]
    fn test_part_ranges_more_connections_than_bytes() {
        let ranges = part_ranges(2, 5);
        assert_eq!(ranges, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_part_ranges_empty_total() {
        assert!(part_ranges(0, 4).is_empty());
    }

    #[test]
    fn test_content_range_total() {
        assert_eq!(content_range_total("bytes 0-0/10494470"), Some(10_494_470));
        assert_eq!(content_range_total("bytes 0-0/*"), None);
        assert_eq!(content_range_total("garbage"), None);
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("https://example.com/dir/archive.tar.gz").unwrap(),
            "archive.tar.gz"
        );
        assert_eq!(
            file_name_from_url("https://example.com/file.bin?token=abc#frag").unwrap(),
            "file.bin"
        );
        assert_eq!(
            file_name_from_url("https://example.com/").unwrap(),
            DEFAULT_FILE_NAME
        );
        assert!(file_name_from_url("not a url").is_err());
    }

    #[test]
    fn test_part_path_names() {
        let path = part_path(Path::new("out/archive.zip"), 3);
        assert_eq!(path, PathBuf::from("out/archive.zip.part3"));
    }
}
