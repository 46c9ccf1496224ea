//! Certificate Validation CLI

use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use cv_artifacts::{
    build_payload, build_verification_file, payload_data_uri, render_certificate,
    validate_qr_data, CertificateData, VerificationMetadata, WatermarkOptions,
};
use cv_core::{Validator, VerificationStatus};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "cv")]
#[command(about = "Certificate Authenticity Validation Tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a certificate document
    Validate {
        /// Path to certificate file
        #[arg(short, long)]
        file: PathBuf,

        /// Emit the full validation result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate proof artifacts from a validation result
    Certificate {
        /// Path to a validation result JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF path (defaults to verified-certificate-<id>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the verification JSON to this path
        #[arg(long)]
        verification: Option<PathBuf>,
    },

    /// Check a scanned QR payload
    Verify {
        /// Path to a QR payload JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show information about a certificate file
    Info {
        /// Path to certificate file
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    match cli.command {
        Commands::Validate { file, json } => {
            cmd_validate(file, json);
        }
        Commands::Certificate {
            input,
            output,
            verification,
        } => {
            cmd_certificate(input, output, verification);
        }
        Commands::Verify { file } => {
            cmd_verify(file);
        }
        Commands::Info { file } => {
            cmd_info(file);
        }
    }
}

fn cmd_validate(file: PathBuf, json: bool) {
    info!("Validating certificate: {}", file.display());

    if !file.exists() {
        error!("File not found: {}", file.display());
        std::process::exit(1);
    }

    let validator = Validator::new();

    match validator.validate_file(&file) {
        Ok(result) => {
            if json {
                let output = serde_json::to_string_pretty(&result)
                    .expect("Failed to serialize validation result");
                println!("{}", output);
                return;
            }

            let status =
                VerificationStatus::classify(result.authenticity.as_str(), result.confidence_score);

            println!("\nValidation Result\n{}", "=".repeat(50));
            println!("File: {}", result.file_name);
            println!("Size: {} bytes", result.file_size);
            println!("Status: {}", status.label());
            println!("Authenticity: {}", result.authenticity.as_str());
            println!("Confidence: {}%", result.confidence_score);
            println!("Processing time: {} ms", result.processing_time);

            if !result.issues.is_empty() {
                println!("\nIssues:");
                for issue in &result.issues {
                    println!("  - {}", issue);
                }
            }

            println!("\nCertificate Details:");
            println!("  ID: {}", result.metadata.certificate_id);
            println!("  Student: {}", result.metadata.student_name);
            println!("  Degree: {}", result.metadata.degree);
            println!("  Institution: {}", result.metadata.institution);
            println!("  Graduation: {}", result.metadata.graduation_date);

            println!("\nTechnical Analysis:");
            for (check, score) in &result.technical_analysis {
                println!("  {}: {}", check, score);
            }
        }
        Err(e) => {
            error!("Validation failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_certificate(input: PathBuf, output: Option<PathBuf>, verification: Option<PathBuf>) {
    info!("Generating certificate artifacts from: {}", input.display());

    if !input.exists() {
        error!("File not found: {}", input.display());
        std::process::exit(1);
    }

    let text = std::fs::read_to_string(&input).expect("Failed to read input file");
    let data: CertificateData = match serde_json::from_str(&text) {
        Ok(data) => data,
        Err(e) => {
            error!("Invalid validation result: {}", e);
            std::process::exit(1);
        }
    };

    let metadata = match VerificationMetadata::from_certificate(&data) {
        Ok(metadata) => metadata,
        Err(e) => {
            error!("Failed to build verification metadata: {}", e);
            std::process::exit(1);
        }
    };

    let qr_data_uri = match build_payload(&metadata) {
        Ok(payload) => payload_data_uri(&payload),
        Err(e) => {
            error!("Failed to build QR payload: {}", e);
            std::process::exit(1);
        }
    };

    let watermark =
        WatermarkOptions::for_institution(&data.metadata.institution, Utc::now().year());

    match render_certificate(&data, &qr_data_uri, &watermark) {
        Ok(bytes) => {
            let out_path = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "verified-certificate-{}.pdf",
                    metadata.certificate_id
                ))
            });
            std::fs::write(&out_path, &bytes).expect("Failed to write output file");
            info!("Certificate written to: {}", out_path.display());
        }
        Err(e) => {
            error!("Certificate generation failed: {}", e);
            std::process::exit(1);
        }
    }

    if let Some(verification_path) = verification {
        match build_verification_file(&data).and_then(|file| file.pretty_json()) {
            Ok(json) => {
                std::fs::write(&verification_path, json)
                    .expect("Failed to write verification file");
                info!(
                    "Verification file written to: {}",
                    verification_path.display()
                );
            }
            Err(e) => {
                error!("Failed to build verification file: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn cmd_verify(file: PathBuf) {
    info!("Checking QR payload: {}", file.display());

    if !file.exists() {
        error!("File not found: {}", file.display());
        std::process::exit(1);
    }

    let text = std::fs::read_to_string(&file).expect("Failed to read file");
    let payload: serde_json::Value = match serde_json::from_str(&text) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Invalid QR payload: {}", e);
            std::process::exit(1);
        }
    };

    let check = validate_qr_data(&payload);

    println!("\nQR Payload Check\n{}", "=".repeat(50));
    if check.is_valid {
        println!("Payload VALID");
    } else {
        let reason = check.error.unwrap_or_else(|| "unknown".to_string());
        println!("Payload INVALID: {}", reason);
        std::process::exit(1);
    }
}

fn cmd_info(file: PathBuf) {
    info!("Inspecting: {}", file.display());

    if !file.exists() {
        error!("File not found: {}", file.display());
        std::process::exit(1);
    }

    let data = std::fs::read(&file).expect("Failed to read file");

    println!("\nCertificate File Information\n{}", "=".repeat(50));
    println!("File: {}", file.display());
    println!(
        "Size: {} bytes ({:.2} MB)",
        data.len(),
        data.len() as f64 / 1024.0 / 1024.0
    );

    // Hash
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(&data);
    let hash = hex::encode(hasher.finalize());
    println!("SHA-256: {}", hash);

    // Content type is guessed from the extension, matching upload handling
    let mime = mime_guess::from_path(&file).first_or_octet_stream();
    println!("Type: {}", mime.essence_str());

    let validator = Validator::new();
    match validator.policy().check(mime.essence_str(), data.len() as u64) {
        Ok(()) => println!("Upload policy: accepted"),
        Err(rejection) => println!("Upload policy: rejected ({})", rejection),
    }
}
