//! Image-generation URLs for the Pollinations service.
//!
//! Nothing is fetched here: the URL itself is the artifact, and whoever
//! renders it decides how to show it.

use metarouter_core::config::schema::ImageConfig;

/// Builds image-generation URLs from prompts.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageService {
    endpoint: String,
    width: u32,
    height: u32,
    nologo: bool,
    seed: String,
}

impl ImageService {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            width: config.width,
            height: config.height,
            nologo: config.nologo,
            seed: config.seed.clone(),
        }
    }

    /// URL of the image generated for `prompt`.
    ///
    /// The prompt is percent-encoded into a single path segment. Every
    /// reserved character is escaped, `/` included (`AC/DC` becomes
    /// `AC%2FDC`), unlike path-style quoting that leaves `/` alone. A prompt
    /// can therefore never add path segments or query parameters.
    pub fn url_for(&self, prompt: &str) -> String {
        format!(
            "{}/{}?width={}&height={}&nologo={}&seed={}",
            self.endpoint,
            urlencoding::encode(prompt),
            self.width,
            self.height,
            self.nologo,
            urlencoding::encode(&self.seed),
        )
    }
}

impl Default for ImageService {
    fn default() -> Self {
        Self::new(&ImageConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let url = ImageService::default().url_for("dibuja un dragon");
        assert_eq!(
            url,
            "https://image.pollinations.ai/prompt/dibuja%20un%20dragon?width=1024&height=1024&nologo=true&seed=random"
        );
    }

    #[test]
    fn test_url_is_pure_function_of_prompt() {
        let service = ImageService::default();
        assert_eq!(service.url_for("un gato azul"), service.url_for("un gato azul"));
        assert_ne!(service.url_for("un gato azul"), service.url_for("un gato rojo"));
    }

    #[test]
    fn test_reserved_characters_encoded() {
        let url = ImageService::default().url_for("logo a/b?c=d&e ñ");
        assert!(url.starts_with("https://image.pollinations.ai/prompt/logo%20a%2Fb%3Fc%3Dd%26e%20%C3%B1?"));
    }

    #[test]
    fn test_slash_stays_in_one_segment() {
        let url = ImageService::default().url_for("logo de AC/DC");
        assert_eq!(
            url,
            "https://image.pollinations.ai/prompt/logo%20de%20AC%2FDC?width=1024&height=1024&nologo=true&seed=random"
        );
    }

    #[test]
    fn test_custom_config() {
        let config = ImageConfig {
            endpoint: "http://localhost:9000/prompt/".into(),
            width: 512,
            height: 256,
            nologo: false,
            seed: "42".into(),
            open_in_browser: false,
        };
        let url = ImageService::new(&config).url_for("foto");
        assert_eq!(
            url,
            "http://localhost:9000/prompt/foto?width=512&height=256&nologo=false&seed=42"
        );
    }
}
