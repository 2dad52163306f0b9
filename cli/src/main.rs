//! pdfsift CLI - batch PDF sifting and OCR tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsift::ocr::check::{QUOTA_CHECKLIST, TROUBLESHOOTING};
use pdfsift::ocr::{
    check_credentials, find_images, run_batch, BaiduOcrClient, CredentialReport, OcrCredentials,
    OcrEvent, OcrOptions, OcrPreview,
};
use pdfsift::{
    BlockOptions, DocumentOutcome, Pipeline, PipelineOptions, ProgressEvent, RenderOptions,
    RunSummary,
};

#[derive(Parser)]
#[command(name = "pdfsift")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Split PDFs into text blocks and page images, and OCR images in bulk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text blocks and page images from every PDF in a directory tree
    Pdf {
        /// Directory searched recursively for PDFs
        #[arg(short, long, value_name = "DIR")]
        input_dir: PathBuf,

        /// Directory receiving text_blocks/ and images/
        #[arg(short, long, value_name = "DIR")]
        output_dir: PathBuf,

        /// Rendering resolution
        #[arg(long, env = "PDFSIFT_DPI", default_value = "200")]
        dpi: u16,

        /// Let text blocks continue across page breaks
        #[arg(long)]
        join_pages: bool,

        /// Also write the run summary as JSON to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Send every image in a directory to the OCR service
    Ocr {
        /// Directory containing the images (not searched recursively)
        #[arg(short, long, value_name = "DIR")]
        image_dir: PathBuf,

        /// Directory receiving the JSON results
        #[arg(short, long, value_name = "DIR", default_value = "ocr_json_results")]
        output_dir: PathBuf,

        /// Recognized lines shown per image
        #[arg(long, env = "PDFSIFT_OCR_PREVIEW_LINES", default_value = "10")]
        preview_lines: usize,
    },

    /// Verify the OCR credentials with a blank test image
    CheckCredentials,

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pdf {
            input_dir,
            output_dir,
            dpi,
            join_pages,
            report,
        } => cmd_pdf(&input_dir, &output_dir, dpi, join_pages, report.as_deref()),
        Commands::Ocr {
            image_dir,
            output_dir,
            preview_lines,
        } => cmd_ocr(&image_dir, &output_dir, preview_lines),
        Commands::CheckCredentials => cmd_check_credentials(),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn cmd_pdf(
    input_dir: &Path,
    output_dir: &Path,
    dpi: u16,
    join_pages: bool,
    report: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut blocks = BlockOptions::new();
    if join_pages {
        blocks = blocks.join_pages();
    }
    let options = PipelineOptions::new()
        .with_block_options(blocks)
        .with_render_options(RenderOptions::new().with_dpi(dpi));
    let pipeline = Pipeline::with_default_backends(options);

    let mut pb: Option<ProgressBar> = None;
    let summary = pipeline.run_with_progress(input_dir, output_dir, |event| match event {
        ProgressEvent::Discovered { total } => {
            if total == 0 {
                println!("{}", "No PDF files found.".yellow());
            } else {
                pb = Some(progress_bar(total as u64));
            }
        }
        ProgressEvent::Started { path, .. } => {
            if let Some(pb) = &pb {
                pb.set_message(file_label(path));
            }
        }
        ProgressEvent::Finished { result, .. } => {
            if let Some(pb) = &pb {
                match &result.outcome {
                    DocumentOutcome::Processed(r) if r.image_error.is_some() => pb.println(format!(
                        "{} {}: images not rendered",
                        "Warning".yellow(),
                        result.path.display()
                    )),
                    DocumentOutcome::Skipped { reason } => pb.println(format!(
                        "{} {}: {}",
                        "Skipped".yellow(),
                        result.path.display(),
                        reason
                    )),
                    DocumentOutcome::Failed { error, .. } => pb.println(format!(
                        "{} {}: {}",
                        "Failed".red(),
                        result.path.display(),
                        error
                    )),
                    DocumentOutcome::Processed(_) => {}
                }
                pb.inc(1);
            }
        }
    })?;

    if let Some(pb) = &pb {
        pb.finish_with_message("Done!");
    }

    print_run_summary(&summary);

    if let Some(path) = report {
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }

    Ok(())
}

fn print_run_summary(summary: &RunSummary) {
    println!();
    println!("{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Documents".bold(), summary.documents.len());
    println!("{}: {}", "Processed".bold(), summary.processed());
    println!("{}: {}", "Skipped".bold(), summary.skipped());
    println!("{}: {}", "Failed".bold(), summary.failed());
    println!("{}: {}", "Text blocks".bold(), summary.total_blocks());
    println!("{}: {}", "Images".bold(), summary.total_images());
    if summary.image_failures() > 0 {
        println!(
            "{}: {}",
            "Rendering failures".bold(),
            summary.image_failures()
        );
    }

    println!("\n{}", "Output folders:".green().bold());
    println!(
        "  {} {}",
        "├─".dimmed(),
        summary.output_dir.join(pdfsift::walk::TEXT_BLOCKS_DIR).display()
    );
    println!(
        "  {} {}",
        "└─".dimmed(),
        summary.output_dir.join(pdfsift::walk::IMAGES_DIR).display()
    );
}

fn cmd_ocr(
    image_dir: &Path,
    output_dir: &Path,
    preview_lines: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = OcrCredentials::from_env()?;
    let client = BaiduOcrClient::new(
        credentials,
        OcrOptions::new().with_preview_lines(preview_lines),
    )?;

    let images = find_images(image_dir)?;
    if images.is_empty() {
        println!(
            "{} {}",
            "No images found in".yellow(),
            image_dir.display()
        );
        return Ok(());
    }
    println!("{} {} images", "Found".cyan(), images.len());

    let pb = progress_bar(images.len() as u64);
    let summary = run_batch(&client, &images, output_dir, preview_lines, |event| {
        match event {
            OcrEvent::Started { path, .. } => pb.set_message(file_label(path)),
            OcrEvent::Finished { path, result, .. } => {
                match result {
                    Ok(done) => {
                        pb.println(format!(
                            "{} {} -> {}",
                            "Saved".green(),
                            file_label(path),
                            done.output.display()
                        ));
                        for line in preview_text(&done.preview) {
                            pb.println(line);
                        }
                    }
                    Err(e) => pb.println(format!(
                        "{} {}: {}",
                        "Failed".red(),
                        file_label(path),
                        e
                    )),
                }
                pb.inc(1);
            }
        }
    })?;
    pb.finish_with_message("Done!");

    println!(
        "\n{} {}/{} images recognized",
        "Done!".green().bold(),
        summary.succeeded(),
        summary.total
    );
    if summary.failed() > 0 {
        println!("{}: {}", "Failed".red().bold(), summary.failed());
    }
    println!("{} {}", "Results in".green(), output_dir.display());

    Ok(())
}

fn preview_text(preview: &OcrPreview) -> Vec<String> {
    match preview {
        OcrPreview::Lines { shown, .. } => {
            let mut lines: Vec<String> = shown
                .iter()
                .map(|line| match line.confidence {
                    Some(c) => format!(
                        "  {:>3}. {} {}",
                        line.number,
                        line.words,
                        format!("({:.2})", c).dimmed()
                    ),
                    None => format!("  {:>3}. {}", line.number, line.words),
                })
                .collect();
            if preview.hidden() > 0 {
                lines.push(
                    format!("  ... {} more lines", preview.hidden())
                        .dimmed()
                        .to_string(),
                );
            }
            lines
        }
        OcrPreview::Unrecognized { keys } => vec![format!(
            "  {} response keys: {}",
            "No words_result;".yellow(),
            keys.join(", ")
        )],
    }
}

fn cmd_check_credentials() -> Result<(), Box<dyn std::error::Error>> {
    let credentials = OcrCredentials::from_env()?;

    println!("{}", "OCR Credentials".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (name, value) in credentials.masked() {
        println!("{}: {}", name.bold(), value);
    }
    println!();

    let client = BaiduOcrClient::new(credentials, OcrOptions::new())?;
    println!("{}", "Sending blank test image...".cyan());

    match check_credentials(&client)? {
        CredentialReport::Accepted { lines, response } => {
            println!("{}", "Credentials accepted.".green().bold());
            if let Some(n) = lines {
                println!("{}: {}", "Lines recognized".bold(), n);
            }
            log::debug!("probe response: {}", response);
            Ok(())
        }
        CredentialReport::Rejected {
            code,
            message,
            explanation,
        } => {
            match code {
                Some(code) => println!("{} {}: {}", "Rejected".red().bold(), code, message),
                None => println!("{} {}", "Rejected".red().bold(), message),
            }
            if let Some(text) = explanation {
                println!("{}: {}", "Meaning".bold(), text);
            }

            println!("\n{}", "Troubleshooting".yellow().bold());
            for (i, step) in TROUBLESHOOTING.iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
            println!("\n{}", "Console pages to check".yellow().bold());
            for page in QUOTA_CHECKLIST {
                println!("  {} {}", "-".dimmed(), page);
            }

            Err("OCR credentials were rejected".into())
        }
    }
}

fn cmd_version() {
    println!("{} {}", "pdfsift".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Batch PDF text-block and page-image extraction, with OCR tooling");
    println!();
    println!("License: MIT");
}
