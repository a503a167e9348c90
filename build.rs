use dotenv::dotenv;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use toml::Value;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

/// `ENCRYPTION_KEY` / `ENCRYPTION_IV` from the environment or `.env`, else
/// material derived from the package name so stored passwords survive rebuilds.
fn cipher_material(var: &str, len: usize, fallback: &str) -> Vec<u8> {
    match env::var(var) {
        Ok(value) if value.len() == len => value.into_bytes(),
        Ok(value) => panic!("{} must be exactly {} bytes long, got {}", var, len, value.len()),
        Err(_) => {
            println!("cargo:warning={} not set, the stored SMTP password uses the built-in value", var);
            let mut bytes = fallback.as_bytes().to_vec();
            bytes.resize(len, b'!');
            bytes
        }
    }
}

fn owner() -> io::Result<String> {
    let manifest: Value = toml::from_str(&fs::read_to_string("Cargo.toml")?).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(manifest
        .get("package")
        .and_then(|pkg| pkg.get("metadata"))
        .and_then(|meta| meta.get("owner"))
        .and_then(Value::as_str)
        .unwrap_or("eqtrack")
        .to_string())
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=ENCRYPTION_KEY");
    println!("cargo:rerun-if-env-changed=ENCRYPTION_IV");
    let _ = dotenv();

    let package = env::var("CARGO_PKG_NAME").unwrap_or_else(|_| "eqtrack".to_string());
    let key = cipher_material("ENCRYPTION_KEY", KEY_LEN, &format!("{}_smtp_secret_key_material", package));
    let iv = cipher_material("ENCRYPTION_IV", IV_LEN, &format!("{}_smtp_iv", package));

    let mut out = String::new();
    let _ = writeln!(out, "#[allow(unused)]\npub const APP_METADATA_OWNER: &str = {:?};", owner()?);
    for (name, bytes) in [("ENCRYPTION_KEY", &key), ("ENCRYPTION_IV", &iv)] {
        let _ = writeln!(out, "#[allow(unused)]\npub const APP_METADATA_{}: &[u8; {}] = &{:?};", name, bytes.len(), bytes);
    }

    let out_dir = env::var("OUT_DIR").map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
    fs::write(Path::new(&out_dir).join("app_metadata.rs"), out)
}
