use std::env;

#[derive(Debug)]
pub struct Settings {
    /// OTLP HTTP server port (log export + operator endpoints)
    pub otlp_http_port: u16,
    /// Optional cap on the retained log buffer; `None` keeps every record
    pub retained_log_cap: Option<usize>,
}

impl Settings {
    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        validate_port(self.otlp_http_port)?;
        if self.retained_log_cap == Some(0) {
            return Err("LOG_RETENTION_CAP cannot be 0".into());
        }
        Ok(())
    }
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    if port == 0 {
        return Err("Port cannot be 0".into());
    }
    Ok(())
}

pub fn get_configuration() -> Result<Settings, Box<dyn std::error::Error>> {
    // 4318 is the well-known OTLP/HTTP port
    let otlp_http_port = env::var("OTLP_HTTP_PORT")
        .unwrap_or_else(|_| "4318".to_string())
        .parse::<u16>()?;

    let retained_log_cap = match env::var("LOG_RETENTION_CAP") {
        Ok(v) => Some(v.parse::<usize>()?),
        Err(_) => None,
    };

    let settings = Settings {
        otlp_http_port,
        retained_log_cap,
    };

    // Validate settings before returning
    settings.validate()?;

    Ok(settings)
}
