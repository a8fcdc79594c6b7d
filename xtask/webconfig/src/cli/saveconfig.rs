use crate::api::{HttpConfigApi, PersistReply};
use crate::config::ClientConfig;
use crate::error::{Result, WebConfigError};

fn client(config: &ClientConfig) -> Result<HttpConfigApi> {
    HttpConfigApi::new(&config.base_url, config.request_timeout)
}

fn check(reply: PersistReply) -> Result<String> {
    if reply.success {
        Ok(reply.filename.unwrap_or_default())
    } else {
        Err(WebConfigError::Rejected(
            reply.error.unwrap_or_else(|| "unknown error".to_string()),
        ))
    }
}

pub async fn save_command(config: &ClientConfig, filename: Option<&str>) -> Result<()> {
    let reply = client(config)?.save_config(filename).await?;
    if let Some(message) = reply.message.clone().filter(|m| !m.is_empty()) {
        println!("{}", message);
    }
    let saved = check(reply)?;
    println!("✅ Configuration saved to {}", saved);
    Ok(())
}

pub async fn load_command(config: &ClientConfig, filename: &str) -> Result<()> {
    let reply = client(config)?.load_config(filename).await?;
    if let Some(message) = reply.message.clone().filter(|m| !m.is_empty()) {
        println!("{}", message);
    }
    let loaded = check(reply)?;
    println!("✅ Configuration loaded from {}", loaded);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_reply() {
        let ok = PersistReply {
            success: true,
            filename: Some(".config".to_string()),
            ..PersistReply::default()
        };
        assert_eq!(check(ok).unwrap(), ".config");

        let rejected = PersistReply {
            error: Some("No such file".to_string()),
            ..PersistReply::default()
        };
        let err = check(rejected).unwrap_err();
        assert_eq!(err.to_string(), "Request rejected: No such file");
    }
}
