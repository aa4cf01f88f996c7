use csrtool::csr::build_csr;
use csrtool::csr::params::DistinguishedName;
use csrtool::key::KeyPair;

fn main() -> anyhow::Result<()> {
    // Generate an RSA key pair for the requester (or choose ECDSA P-256/P-384)
    let key = KeyPair::generate_rsa(2048)?;

    let subject = DistinguishedName::new("example.com")
        .organization("Example Organization")
        .organizational_unit("Example Unit")
        .country("US")
        .province("California")
        .locality("San Francisco");

    let csr_pem = build_csr(
        &key,
        &subject,
        &["example.com".to_string(), "www.example.com".to_string()],
        "hello321",
    )?;

    std::fs::write("example.csr", &csr_pem)?;
    println!("Certificate Request PEM:\n{csr_pem}");
    println!("Saved to example.csr");

    Ok(())
}
