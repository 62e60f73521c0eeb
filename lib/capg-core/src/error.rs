use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Master endpoint not found in apiEndpoints for cluster {0}")]
    MissingEndpoint(String),

    #[error("Error decoding provider spec: {0}")]
    Decode(String),

    #[error("Error encoding {0}: not a JSON object")]
    Encode(String),

    #[error("Kind not registered in scheme: {0}")]
    UnregisteredKind(String),

    #[error("Failed to parse CA certificate: {0}")]
    CertificateParse(String),

    #[error("Invalid public key pin: {0}")]
    InvalidPin(String),

    #[error("No allowed public key pin matches CA certificate with hash {0}")]
    PinMismatch(String),

    #[error("Could not find a matching machine setup config for {0}")]
    NoMachineSetup(String),

    #[error("Invalid machine setup configs: {0}")]
    MachineSetup(#[from] serde_yaml::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
