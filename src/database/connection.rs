use log::{error, warn};
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use postgres_openssl::MakeTlsConnector;
use tokio::time::Duration;
use url::Url;

const MAX_RETRIES: usize = 5;
const WAIT_BETWEEN_RETRIES: u64 = 2;

pub fn create_ssl_connector(sslrootcert_path: &str) -> Result<MakeTlsConnector, String> {
    let mut builder =
        SslConnector::builder(SslMethod::tls()).map_err(|e| format!("SSL builder error: {}", e))?;

    builder
        .set_ca_file(sslrootcert_path)
        .map_err(|e| format!("Error loading CA cert: {}", e))?;

    builder.set_verify(SslVerifyMode::NONE); // TEMPORARY FOR SELF-SIGNED CERTS

    Ok(MakeTlsConnector::new(builder.build()))
}

/// Split the `sslrootcert` parameter off a connection URL
///
/// Returns the URL without that parameter, which tokio-postgres does not
/// understand, together with the CA certificate path.
pub fn split_sslrootcert(database_url: &str) -> Result<(String, String), String> {
    let url = Url::parse(database_url).map_err(|e| format!("URL parse error: {}", e))?;

    let mut sslrootcert_path = None;
    let mut clean_params = Vec::new();
    for (key, value) in url.query_pairs() {
        if key == "sslrootcert" {
            sslrootcert_path = Some(value.to_string());
        } else {
            clean_params.push((key.into_owned(), value.into_owned()));
        }
    }

    let sslrootcert_path = sslrootcert_path.ok_or("sslrootcert parameter missing")?;

    let mut clean_url = url.clone();
    clean_url.set_query(None);
    if !clean_params.is_empty() {
        let query = clean_params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        clean_url.set_query(Some(&query));
    }

    Ok((clean_url.to_string(), sslrootcert_path))
}

/// Connect and run `operation`, retrying on connection or query failure
pub async fn execute_with_retry<T, F, Fut>(database_url: &str, operation: F) -> Result<T, String>
where
    F: Fn(tokio_postgres::Client) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<T, tokio_postgres::Error>> + Send,
{
    let (clean_database_url, sslrootcert_path) = split_sslrootcert(database_url)?;

    for attempt in 0..MAX_RETRIES {
        let connector = match create_ssl_connector(&sslrootcert_path) {
            Ok(c) => c,
            Err(e) => {
                error!("Attempt {}: SSL connector error: {}", attempt + 1, e);
                continue;
            }
        };

        match tokio_postgres::connect(&clean_database_url, connector).await {
            Ok((client, connection)) => {
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        error!("Connection error: {}", e);
                    }
                });

                match operation(client).await {
                    Ok(value) => return Ok(value),
                    Err(e) => error!("Attempt {}: query error: {}", attempt + 1, e),
                }
            }
            Err(e) => error!("Attempt {}: connection error: {}", attempt + 1, e),
        }

        if attempt < MAX_RETRIES - 1 {
            warn!("Retrying in {} seconds", WAIT_BETWEEN_RETRIES);
            tokio::time::sleep(Duration::from_secs(WAIT_BETWEEN_RETRIES)).await;
        }
    }

    Err("Max retries exceeded".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sslrootcert() {
        let (url, cert) = split_sslrootcert(
            "postgres://user:pw@db.local:5432/freshtrack?sslmode=require&sslrootcert=/etc/ca.pem",
        )
        .unwrap();
        assert_eq!(url, "postgres://user:pw@db.local:5432/freshtrack?sslmode=require");
        assert_eq!(cert, "/etc/ca.pem");
    }

    #[test]
    fn test_split_sslrootcert_only_param() {
        let (url, _) =
            split_sslrootcert("postgres://db.local/freshtrack?sslrootcert=ca.pem").unwrap();
        assert_eq!(url, "postgres://db.local/freshtrack");
    }

    #[test]
    fn test_split_sslrootcert_missing() {
        assert!(split_sslrootcert("postgres://db.local/freshtrack").is_err());
        assert!(split_sslrootcert("not a url").is_err());
    }
}
