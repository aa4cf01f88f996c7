use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use csrtool::csr::CertificationRequest;
use csrtool::csr::params::{CsrParams, DistinguishedName};
use csrtool::key::{KeyPair, KeyType};

#[derive(Args)]
pub(crate) struct Config {
    /// Type of key to generate (rsa2048, rsa4096, ec256, ec384)
    #[arg(long, default_value = "rsa2048")]
    key_type: KeyType,

    /// Use an existing PKCS#8 PEM private key instead of generating one
    #[arg(long, conflicts_with = "key_type")]
    key: Option<PathBuf>,

    /// Output file for the private key
    #[arg(long, default_value = "private.key")]
    output_key: PathBuf,

    /// Output file for the CSR
    #[arg(long, default_value = "request.csr")]
    output_csr: PathBuf,

    /// Common Name (CN) for the certificate
    #[arg(long, required = true, value_parser = clap::builder::NonEmptyStringValueParser::new())]
    common_name: String,

    /// Organization (O) for the certificate
    #[arg(long)]
    organization: Vec<String>,

    /// Organizational Unit (OU) for the certificate
    #[arg(long)]
    organizational_unit: Vec<String>,

    /// Country (C) for the certificate
    #[arg(long)]
    country: Vec<String>,

    /// Province/State (ST) for the certificate
    #[arg(long)]
    province: Vec<String>,

    /// Locality (L) for the certificate
    #[arg(long)]
    locality: Vec<String>,

    /// DNS names for the certificate
    #[arg(long)]
    dns_names: Vec<String>,

    /// Challenge password for the CSR
    #[arg(long, default_value = "")]
    challenge_password: String,
}

impl Config {
    fn subject(&self) -> DistinguishedName {
        let mut subject = DistinguishedName::new(self.common_name.as_str());
        for o in &self.organization {
            subject = subject.organization(o.as_str());
        }
        for ou in &self.organizational_unit {
            subject = subject.organizational_unit(ou.as_str());
        }
        for c in &self.country {
            subject = subject.country(c.as_str());
        }
        for st in &self.province {
            subject = subject.province(st.as_str());
        }
        for l in &self.locality {
            subject = subject.locality(l.as_str());
        }
        subject
    }
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let key = match &config.key {
        Some(path) => {
            let pem = fs::read_to_string(path)
                .with_context(|| format!("Failed to read private key {}", path.display()))?;
            KeyPair::from_pkcs8_pem(&pem).context("Failed to load private key")?
        }
        None => {
            log::info!("generating {} private key", config.key_type);
            let key = KeyPair::generate(config.key_type).context("Failed to generate private key")?;
            let pem = key.to_pkcs8_pem().context("Failed to marshal private key")?;
            write_private_key(&config.output_key, &pem)?;
            key
        }
    };

    let params = CsrParams::builder()
        .subject(config.subject())
        .dns_names(config.dns_names.clone())
        .challenge_password(config.challenge_password.clone())
        .build();

    let csr = CertificationRequest::build(&key, &params)
        .and_then(|request| request.to_pem())
        .context("Failed to generate CSR")?;

    fs::write(&config.output_csr, csr)
        .with_context(|| format!("Failed to write CSR {}", config.output_csr.display()))?;

    if config.key.is_none() {
        println!("Private key saved to: {}", config.output_key.display());
    }
    println!("CSR saved to: {}", config.output_csr.display());
    Ok(())
}

fn write_private_key(path: &Path, pem: &str) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("Failed to write private key {}", path.display()))?;
    file.write_all(pem.as_bytes())
        .with_context(|| format!("Failed to write private key {}", path.display()))?;
    Ok(())
}
