//! RoleProof CLI: `rpf` command.
//!
//! Issues membership and role proofs, verifies role proofs offline,
//! and revokes or checks credentials against an EVM revocation registry.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};

use roleproof::registry::config::NETWORKS_ENV;
use roleproof::time::{millis_to_rfc3339, now_millis, DAY_MS, HOUR_MS};
use roleproof::{
    build_membership_proof, build_role_proof, resolve_credential_id, resolve_issuer,
    resolve_status, verify, Authorization, ClaimSigner, CredentialFingerprint, CredentialToken,
    EvmRegistry, Identity, LocalKey, MembershipProof, RegistryConfig, RegistryLocation,
    RevocationClient, RoleProof, StatusEntry, VerificationResult,
};

// ── Input helpers ─────────────────────────────────────────────────────────────

/// Read a file, or stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, format!("{content}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}

fn load_key(hex: &str) -> Result<LocalKey> {
    LocalKey::from_hex(hex).context("invalid private key")
}

fn load_token(path: &Path) -> Result<CredentialToken> {
    let input = read_input(path)?;
    CredentialToken::parse(&input).context("failed to decode credential token")
}

/// Networks from `ROLEPROOF_NETWORKS`, overlaid with the optional JSON file.
fn load_networks(file: Option<&Path>) -> Result<RegistryConfig> {
    let from_env = RegistryConfig::from_env().with_context(|| format!("invalid {NETWORKS_ENV}"))?;
    match file {
        Some(path) => {
            let from_file = RegistryConfig::from_json_file(path)
                .with_context(|| format!("failed to load networks from {}", path.display()))?;
            Ok(from_env.merge(from_file))
        }
        None => Ok(from_env),
    }
}

/// Parse `network:0xAddress` into a registry location.
fn parse_registry(locator: &str) -> Result<RegistryLocation> {
    StatusEntry {
        method: roleproof::status::ETHR_STATUS_REGISTRY_2019.to_string(),
        locator: locator.to_string(),
    }
    .registry_location()
    .map_err(|e| anyhow!("{e}; expected <network>:<registryAddress>"))
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

// ── Time helpers ──────────────────────────────────────────────────────────────

/// Parse a duration string like "12h", "30d" or "1d12h".
/// Returns the duration as milliseconds.
fn parse_duration_to_millis(s: &str) -> Result<u64> {
    let s = s.trim();
    let mut total: u64 = 0;
    let mut current = String::new();

    for ch in s.chars() {
        if ch.is_ascii_digit() {
            current.push(ch);
            continue;
        }
        let val: u64 = current
            .parse()
            .map_err(|_| anyhow!("invalid duration: {s}"))?;
        current.clear();
        let unit = match ch {
            'd' => DAY_MS,
            'h' => HOUR_MS,
            'm' => 60 * 1000,
            's' => 1000,
            _ => return Err(anyhow!("unknown duration unit '{ch}' in '{s}'")),
        };
        total = val
            .checked_mul(unit)
            .and_then(|ms| total.checked_add(ms))
            .ok_or_else(|| anyhow!("duration '{s}' is too large"))?;
    }

    if !current.is_empty() {
        return Err(anyhow!("duration '{s}' is missing a unit (d/h/m/s)"));
    }
    if total == 0 {
        return Err(anyhow!("duration must be > 0"));
    }
    Ok(total)
}

fn expiry_from_now(expires_in: &str) -> Result<u64> {
    let duration = parse_duration_to_millis(expires_in)?;
    now_millis()
        .checked_add(duration)
        .ok_or_else(|| anyhow!("expiry overflows"))
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// RoleProof CLI: issue, verify and revoke delegated role proofs.
#[derive(Parser, Debug)]
#[command(
    name = "rpf",
    about = "RoleProof CLI",
    version,
    long_about = "rpf — RoleProof CLI\n\nIssue membership and role proofs, verify role proofs against a trusted\nissuer, and revoke or check credentials in an EVM revocation registry."
)]
struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct KeyArg {
    /// Hex-encoded secp256k1 private key
    #[arg(long = "key", value_name = "KEY", env = "ROLEPROOF_PRIVATE_KEY", hide_env_values = true)]
    hex: String,
}

#[derive(Args, Debug)]
struct FingerprintArg {
    /// Credential fingerprint (0x-prefixed hash)
    #[arg(long, conflicts_with = "credential", required_unless_present = "credential")]
    fingerprint: Option<String>,

    /// Derive the fingerprint by hashing this credential file
    #[arg(long)]
    credential: Option<PathBuf>,
}

impl FingerprintArg {
    fn resolve(&self) -> Result<CredentialFingerprint> {
        match (&self.fingerprint, &self.credential) {
            (Some(hex), _) => Ok(CredentialFingerprint::new(hex.clone())),
            (None, Some(path)) => {
                let raw = std::fs::read(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Ok(CredentialFingerprint::of_credential(raw))
            }
            (None, None) => Err(anyhow!("either --fingerprint or --credential is required")),
        }
    }
}

#[derive(Args, Debug)]
struct NetworksArg {
    /// JSON file mapping network namespaces to RPC endpoints
    #[arg(long = "networks", env = "ROLEPROOF_NETWORKS_FILE")]
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a fresh signing key
    Keygen {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the address of a signing key
    Address {
        #[command(flatten)]
        key: KeyArg,
    },

    /// Issue a membership proof for an organization (issuer key)
    Membership {
        #[command(flatten)]
        key: KeyArg,

        /// Organization (delegator) address
        #[arg(long)]
        delegator: String,

        #[command(flatten)]
        fingerprint: FingerprintArg,

        /// Validity period, e.g. 30d or 12h
        #[arg(long, default_value = "30d")]
        expires_in: String,

        /// Write the proof to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Issue a role proof for a delegate (organization key)
    Role {
        #[command(flatten)]
        key: KeyArg,

        /// Delegate address receiving the role
        #[arg(long)]
        delegate: String,

        /// Role name
        #[arg(long)]
        role: String,

        #[command(flatten)]
        fingerprint: FingerprintArg,

        /// Validity period, e.g. 30d or 12h
        #[arg(long, default_value = "30d")]
        expires_in: String,

        /// Membership proof file issued to this organization
        #[arg(long)]
        membership: PathBuf,

        /// Write the proof to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Verify a role proof against a trusted issuer
    Verify {
        /// Role proof file (`-` for stdin)
        proof: PathBuf,

        /// Trusted issuer address
        #[arg(long, env = "ROLEPROOF_TRUSTED_ISSUER")]
        trusted_issuer: String,

        /// Verification time in ms since epoch (default: now)
        #[arg(long)]
        at: Option<u64>,

        /// Also check both fingerprints in this registry (`network:0xAddress`)
        #[arg(long)]
        registry: Option<String>,

        #[command(flatten)]
        networks: NetworksArg,
    },

    /// Show the revocation pointer, id and issuer of a credential token
    Resolve {
        /// Token file, compact JWT or JSON payload (`-` for stdin)
        token: PathBuf,
    },

    /// Revoke a credential in its registry
    Revoke {
        /// Token file, compact JWT or JSON payload (`-` for stdin)
        token: PathBuf,

        #[command(flatten)]
        key: KeyArg,

        #[command(flatten)]
        networks: NetworksArg,
    },

    /// Check whether a credential has been revoked
    Status {
        /// Token file, compact JWT or JSON payload (`-` for stdin)
        token: PathBuf,

        #[command(flatten)]
        networks: NetworksArg,
    },
}

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Keygen { json } => cmd_keygen(json),
        Commands::Address { key } => cmd_address(&key.hex),
        Commands::Membership {
            key,
            delegator,
            fingerprint,
            expires_in,
            out,
        } => cmd_membership(
            &key.hex,
            &delegator,
            &fingerprint,
            &expires_in,
            out.as_deref(),
            verbose,
        ),
        Commands::Role {
            key,
            delegate,
            role,
            fingerprint,
            expires_in,
            membership,
            out,
        } => cmd_role(
            &key.hex,
            &delegate,
            &role,
            &fingerprint,
            &expires_in,
            &membership,
            out.as_deref(),
            verbose,
        ),
        Commands::Verify {
            proof,
            trusted_issuer,
            at,
            registry,
            networks,
        } => cmd_verify(
            &proof,
            &trusted_issuer,
            at,
            registry.as_deref(),
            networks.file.as_deref(),
            verbose,
        ),
        Commands::Resolve { token } => cmd_resolve(&token),
        Commands::Revoke {
            token,
            key,
            networks,
        } => cmd_revoke(&token, &key.hex, networks.file.as_deref()),
        Commands::Status { token, networks } => cmd_status(&token, networks.file.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

// ── Command implementations ───────────────────────────────────────────────────

/// `rpf keygen [--json]`
fn cmd_keygen(json: bool) -> Result<()> {
    let key = LocalKey::random();
    if json {
        let value = serde_json::json!({
            "address": key.address().as_str(),
            "privateKey": key.to_hex(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Address:     {}", key.address());
        println!("Private key: {}", key.to_hex());
    }
    Ok(())
}

/// `rpf address --key KEY`
fn cmd_address(key_hex: &str) -> Result<()> {
    println!("{}", load_key(key_hex)?.address());
    Ok(())
}

/// `rpf membership --key KEY --delegator ADDR (--fingerprint HASH | --credential FILE)`
fn cmd_membership(
    key_hex: &str,
    delegator: &str,
    fingerprint: &FingerprintArg,
    expires_in: &str,
    out: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let issuer_key = load_key(key_hex)?;
    let expiry = expiry_from_now(expires_in)?;

    let proof = build_membership_proof(
        &issuer_key,
        Identity::new(delegator),
        fingerprint.resolve()?,
        expiry,
    )
    .context("failed to sign membership proof")?;

    if verbose {
        eprintln!("Issuer:  {}", proof.claim.issuer);
        eprintln!("Expires: {}", millis_to_rfc3339(expiry));
    }
    write_output(out, &proof.to_json()?)
}

/// `rpf role --key KEY --delegate ADDR --role NAME --membership FILE ...`
#[allow(clippy::too_many_arguments)]
fn cmd_role(
    key_hex: &str,
    delegate: &str,
    role: &str,
    fingerprint: &FingerprintArg,
    expires_in: &str,
    membership_path: &Path,
    out: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let delegator_key = load_key(key_hex)?;
    let membership = MembershipProof::from_json(&read_input(membership_path)?)
        .context("failed to parse membership proof")?;

    if membership.claim.delegator_address != delegator_key.address() {
        return Err(anyhow!(
            "membership proof was issued to {}, not to this key ({})",
            membership.claim.delegator_address,
            delegator_key.address()
        ));
    }

    let expiry = expiry_from_now(expires_in)?;
    let proof = build_role_proof(
        &delegator_key,
        Identity::new(delegate),
        role,
        fingerprint.resolve()?,
        expiry,
        membership,
    )
    .context("failed to sign role proof")?;

    if verbose {
        eprintln!("Delegator: {}", delegator_key.address());
        eprintln!("Usable until: {}", millis_to_rfc3339(proof.expires_at()));
    }
    write_output(out, &proof.to_json()?)
}

/// `rpf verify PROOF --trusted-issuer ADDR [--at MS] [--registry NET:ADDR]`
fn cmd_verify(
    proof_path: &Path,
    trusted_issuer: &str,
    at: Option<u64>,
    registry: Option<&str>,
    networks: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let proof = RoleProof::from_json(&read_input(proof_path)?).context("failed to parse role proof")?;
    let trusted_issuer = Identity::new(trusted_issuer);
    let now = at.unwrap_or_else(now_millis);

    let outcome = match registry {
        None => match verify(&proof, &trusted_issuer, now) {
            VerificationResult::Accepted => Authorization::Granted,
            VerificationResult::Rejected(rejection) => Authorization::Rejected(rejection),
        },
        Some(locator) => {
            let location = parse_registry(locator)?;
            let connector = EvmRegistry::new(load_networks(networks)?, LocalKey::random())?;
            let client = RevocationClient::new(connector);
            block_on(client.authorize(&proof, &trusted_issuer, now, &location))??
        }
    };

    println!("Delegate:  {}", proof.claim.delegate_address);
    println!("Role:      {}", proof.claim.role);
    println!("Delegator: {}", proof.membership_proof.claim.delegator_address);
    if verbose {
        println!("Expires:   {}", millis_to_rfc3339(proof.expires_at()));
    }

    match outcome {
        Authorization::Granted => {
            println!("Result:    ACCEPTED");
            Ok(())
        }
        Authorization::Rejected(rejection) => {
            println!("Result:    REJECTED ({rejection})");
            Err(anyhow!("role proof rejected: {rejection}"))
        }
        Authorization::Revoked(fingerprint) => {
            println!("Result:    REVOKED ({fingerprint})");
            Err(anyhow!("credential {fingerprint} has been revoked"))
        }
    }
}

/// `rpf resolve TOKEN`
fn cmd_resolve(token_path: &Path) -> Result<()> {
    let token = load_token(token_path)?;
    let status = resolve_status(&token)?;
    let location = status.registry_location()?;
    let id = resolve_credential_id(&token)?;

    println!("Method:     {}", status.method);
    println!("Network:    {}", location.network);
    println!("Registry:   {}", location.address);
    println!("Credential: {id}");
    match resolve_issuer(&token) {
        Ok(issuer) => println!("Issuer:     {issuer}"),
        Err(e) => println!("Issuer:     ({e})"),
    }
    Ok(())
}

/// `rpf revoke TOKEN --key KEY [--networks FILE]`
fn cmd_revoke(token_path: &Path, key_hex: &str, networks: Option<&Path>) -> Result<()> {
    let token = load_token(token_path)?;
    let key = load_key(key_hex)?;
    let caller = key.address();

    let client = RevocationClient::new(EvmRegistry::new(load_networks(networks)?, key)?);
    let id = block_on(client.revoke(&token))?.context("revocation failed")?;

    println!("Revoked credential {id}");
    println!("  Issuer: {caller}");
    Ok(())
}

/// `rpf status TOKEN [--networks FILE]`
fn cmd_status(token_path: &Path, networks: Option<&Path>) -> Result<()> {
    let token = load_token(token_path)?;
    let id = resolve_credential_id(&token)?;

    // Reads need no signer; any key satisfies the connector.
    let connector = EvmRegistry::new(load_networks(networks)?, LocalKey::random())?;
    let client = RevocationClient::new(connector);
    let status = block_on(client.check_revoked(&token))?.context("status check failed")?;

    match status.block_number {
        Some(block) if status.revoked => println!("Credential {id}: REVOKED at block {block}"),
        _ => println!("Credential {id}: not revoked"),
    }
    Ok(())
}
