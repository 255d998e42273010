// cargo run -p downloader --example downloader_demo -- <url> [save_path]

use anyhow::{Context, Result};
use downloader::Downloader;
use std::io::Write;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let url = args.next().context("usage: downloader_demo <url> [save_path]")?;
    let save_path = args.next().unwrap_or_else(|| "./target_image.jpg".to_string());

    println!("Downloading {url} -> {save_path}");

    let downloader = Downloader::new(url, save_path);
    let downloaded = downloader
        .start(|downloaded, total| {
            match total {
                Some(total) if total > 0 => print!(
                    "\rProgress: {:.2}% ({downloaded} / {total} bytes)",
                    downloaded as f64 * 100.0 / total as f64
                ),
                _ => print!("\rProgress: {downloaded} bytes"),
            }
            _ = std::io::stdout().flush();
        })
        .await?;

    println!(
        "\nDownload finished: {} ({downloaded} bytes)",
        downloader.save_path().display()
    );

    Ok(())
}
