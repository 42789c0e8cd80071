//! Loopback rewriting for containerised deployments

use std::collections::HashMap;

use reqwest::Url;

use crate::domain::ResolverEnv;

const LOOPBACK_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Rewrites loopback hosts to an alias that reaches the host machine from
/// inside a container network. A disabled rewriter returns URLs unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalityRewriter {
    enabled: bool,
    host_alias: String,
}

impl LocalityRewriter {
    pub fn new(enabled: bool, host_alias: impl Into<String>) -> Self {
        Self {
            enabled,
            host_alias: host_alias.into(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, "")
    }

    /// Rewriter for one request: enabled by configuration or by the
    /// container flag in the request or process env
    pub fn for_request(env: &ResolverEnv, server_env: &HashMap<String, String>) -> Self {
        Self::new(env.in_container(server_env), env.container.host_alias.clone())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Replace a literal `localhost`/`127.0.0.1` host, keeping scheme, port
    /// and path. Unparseable URLs are returned as given.
    pub fn apply(&self, base_url: &str) -> String {
        if !self.enabled {
            return base_url.to_string();
        }

        let Ok(mut url) = Url::parse(base_url) else {
            return base_url.to_string();
        };

        let is_loopback = url
            .host_str()
            .is_some_and(|host| LOOPBACK_HOSTS.contains(&host));

        if !is_loopback || url.set_host(Some(&self.host_alias)).is_err() {
            return base_url.to_string();
        }

        let mut rewritten = url.to_string();
        if !base_url.ends_with('/') && url.path() == "/" && url.query().is_none() {
            rewritten.pop();
        }

        rewritten
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> LocalityRewriter {
        LocalityRewriter::new(true, "host.docker.internal")
    }

    #[test]
    fn test_disabled_is_noop() {
        let rewriter = LocalityRewriter::disabled();
        assert_eq!(rewriter.apply("http://localhost:1234"), "http://localhost:1234");
    }

    #[test]
    fn test_localhost_rewritten_port_preserved() {
        assert_eq!(
            enabled().apply("http://localhost:1234"),
            "http://host.docker.internal:1234"
        );
    }

    #[test]
    fn test_loopback_ip_rewritten_path_preserved() {
        assert_eq!(
            enabled().apply("http://127.0.0.1:11434/api"),
            "http://host.docker.internal:11434/api"
        );
    }

    #[test]
    fn test_trailing_slash_kept_when_present() {
        assert_eq!(
            enabled().apply("http://localhost:1234/"),
            "http://host.docker.internal:1234/"
        );
    }

    #[test]
    fn test_remote_host_untouched() {
        assert_eq!(
            enabled().apply("https://api.deepseek.com"),
            "https://api.deepseek.com"
        );
        assert_eq!(
            enabled().apply("http://mylocalhost.dev:80"),
            "http://mylocalhost.dev:80"
        );
    }

    #[test]
    fn test_for_request_follows_container_flag() {
        let env = ResolverEnv::new();
        assert!(!LocalityRewriter::for_request(&env, &HashMap::new()).is_enabled());

        let server_env = HashMap::from([("RUNNING_IN_DOCKER".to_string(), "true".to_string())]);
        let rewriter = LocalityRewriter::for_request(&env, &server_env);
        assert_eq!(
            rewriter.apply("http://localhost:11434"),
            "http://host.docker.internal:11434"
        );
    }

    #[test]
    fn test_unparseable_url_untouched() {
        assert_eq!(enabled().apply("not a url"), "not a url");
    }
}
