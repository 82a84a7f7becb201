/// 名字来源查询客户端
///
/// 封装对名字来源服务的 HTTP 调用。客户端本身不做重试，
/// 重试策略全部由编排层决定。
use crate::config::Config;
use crate::error::ApiError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// 名字来源查询能力
///
/// 返回服务端原始响应体。请求没有完成时返回 `ApiError`，
/// 响应体中的业务错误码不在这里判断。
#[async_trait]
pub trait OriginLookup: Send + Sync {
    async fn lookup(&self, name: &str) -> Result<String, ApiError>;
}

/// behindthename.com 查询客户端
pub struct OriginClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout_secs: u64,
}

impl OriginClient {
    /// 创建新的查询客户端
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: config.lookup_base_url.clone(),
            api_key: config.api_key.clone(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    fn request_error(&self, name: &str, source: reqwest::Error) -> ApiError {
        if source.is_timeout() {
            ApiError::Timeout {
                name: name.to_string(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            ApiError::RequestFailed {
                name: name.to_string(),
                source,
            }
        }
    }
}

#[async_trait]
impl OriginLookup for OriginClient {
    async fn lookup(&self, name: &str) -> Result<String, ApiError> {
        debug!("查询名字来源: {}", name);

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("name", name), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| self.request_error(name, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadStatus {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.request_error(name, e))?;

        debug!("{} 响应长度: {} 字节", name, body.len());

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_config(base_url: String) -> Config {
        Config {
            lookup_base_url: base_url,
            api_key: "testkey".to_string(),
            request_timeout_secs: 5,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_lookup_sends_name_and_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/lookup.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "Mary".into()),
                Matcher::UrlEncoded("key".into(), "testkey".into()),
            ]))
            .with_status(200)
            .with_body("<response><name_detail><usage_full>Biblical</usage_full></name_detail></response>")
            .create_async()
            .await;

        let client = OriginClient::new(&test_config(format!("{}/api/lookup.php", server.url()))).unwrap();
        let body = client.lookup("Mary").await.unwrap();

        assert!(body.contains("Biblical"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_lookup_non_2xx_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/lookup.php")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("service unavailable")
            .create_async()
            .await;

        let client = OriginClient::new(&test_config(format!("{}/api/lookup.php", server.url()))).unwrap();
        let err = client.lookup("Mary").await.unwrap_err();

        assert!(matches!(err, ApiError::BadStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_lookup_connection_refused() {
        let client = OriginClient::new(&test_config("http://127.0.0.1:1/api/lookup.php".to_string())).unwrap();
        let err = client.lookup("Mary").await.unwrap_err();

        assert!(matches!(
            err,
            ApiError::RequestFailed { .. } | ApiError::Timeout { .. }
        ));
    }

    #[tokio::test]
    async fn test_lookup_timeout() {
        // 只接受连接，从不返回响应
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let config = Config {
            request_timeout_secs: 1,
            ..test_config(format!("http://{}/api/lookup.php", addr))
        };
        let client = OriginClient::new(&config).unwrap();
        let err = client.lookup("Mary").await.unwrap_err();
        server.abort();

        assert!(
            matches!(err, ApiError::Timeout { timeout_secs: 1, ref name } if name == "Mary"),
            "unexpected error: {err:?}"
        );
    }
}
