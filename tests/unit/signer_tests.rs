// Signer unit tests: scheme layout, determinism, padding and concurrency

use std::sync::Arc;
use std::thread;

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, KeyInit};
use aes::Aes128;
use base64::{engine::general_purpose::URL_SAFE, Engine};
use hmac::{Hmac, Mac};
use rstest::rstest;
use sha1::Sha1;

use thumbor_url::composer::{ComposeError, UrlComposer};
use thumbor_url::crypto::{derive_cipher_key, LegacyCipher};
use thumbor_url::{CropBox, CryptoUrl, Error, ThumborComposer, UrlOptions};

const KEY: &str = "my-security-key";
const IMAGE: &str = "my.server.com/path/to/image.jpg";

fn split_url(url: &str) -> (&str, &str) {
    assert!(url.starts_with('/'), "url must start with '/': {}", url);
    url[1..].split_once('/').expect("url must contain token and path")
}

fn hmac_sha1(key: &[u8], message: &[u8]) -> Vec<u8> {
    let mut mac = <Hmac<Sha1> as Mac>::new_from_slice(key).unwrap();
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// AES-128-ECB decryption that keeps the filler bytes
fn raw_decrypt(ciphertext: &[u8]) -> Vec<u8> {
    let cipher = Aes128::new_from_slice(&derive_cipher_key(KEY.as_bytes())).unwrap();
    let mut buffer = ciphertext.to_vec();
    for block in buffer.chunks_exact_mut(16) {
        cipher.decrypt_block(GenericArray::from_mut_slice(block));
    }
    buffer
}

/// Composer whose legacy path is a fixed string, for padding boundaries
struct FixedComposer(String);

impl UrlComposer for FixedComposer {
    fn plain_image_url(&self, _options: &UrlOptions) -> Result<String, ComposeError> {
        Ok(self.0.clone())
    }

    fn url_for(&self, _options: &UrlOptions) -> Result<String, ComposeError> {
        Ok(self.0.clone())
    }
}

#[test]
fn test_signed_example_from_documentation() {
    let crypto = CryptoUrl::new(KEY).unwrap();
    let options = UrlOptions::new(IMAGE).with_size(300, 200);

    let url = crypto.generate(&options).unwrap();
    let (signature, path) = split_url(&url);

    assert!(signature
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '='));
    assert!(path.contains("300x200"));
    assert!(path.ends_with(IMAGE));
    assert!(url.is_ascii());
}

#[test]
fn test_signature_matches_independent_hmac() {
    let crypto = CryptoUrl::new(KEY).unwrap();
    let options = UrlOptions::new(IMAGE)
        .with_size(300, 200)
        .with_smart(true)
        .with_filter("quality(80)");

    let url = crypto.generate(&options).unwrap();
    let (signature, path) = split_url(&url);

    assert_eq!(
        URL_SAFE.decode(signature).unwrap(),
        hmac_sha1(KEY.as_bytes(), path.as_bytes())
    );
    assert_eq!(path, ThumborComposer.plain_image_url(&options).unwrap());
}

#[test]
fn test_signed_and_legacy_are_deterministic() {
    let crypto = CryptoUrl::new(KEY).unwrap();
    let options = UrlOptions::new(IMAGE)
        .with_crop(CropBox::new(10, 10, 200, 200))
        .with_size(100, 100);

    assert_eq!(
        crypto.generate(&options).unwrap(),
        crypto.generate(&options).unwrap()
    );

    let old = options.with_old(true);
    assert_eq!(crypto.generate(&old).unwrap(), crypto.generate(&old).unwrap());
}

#[rstest]
#[case(UrlOptions::new(IMAGE).with_size(301, 200))]
#[case(UrlOptions::new(IMAGE).with_size(300, 201))]
#[case(UrlOptions::new("my.server.com/path/to/image.png").with_size(300, 200))]
#[case(UrlOptions::new(IMAGE).with_size(300, 200).with_smart(true))]
#[case(UrlOptions::new(IMAGE).with_size(300, 200).with_filter("blur(1)"))]
fn test_single_change_changes_signature(#[case] changed: UrlOptions) {
    let crypto = CryptoUrl::new(KEY).unwrap();
    let base = crypto
        .generate(&UrlOptions::new(IMAGE).with_size(300, 200))
        .unwrap();
    let other = crypto.generate(&changed).unwrap();

    assert_ne!(split_url(&base).0, split_url(&other).0);
}

#[test]
fn test_legacy_roundtrip_with_independent_cipher() {
    let crypto = CryptoUrl::new(KEY).unwrap();
    let options = UrlOptions::new(IMAGE)
        .with_size(300, 200)
        .with_smart(true)
        .with_old(true);

    let url = crypto.generate(&options).unwrap();
    let (token, reference) = split_url(&url);
    assert_eq!(reference, IMAGE);

    let cipher = LegacyCipher::new(&derive_cipher_key(KEY.as_bytes())).unwrap();
    let plaintext = cipher.decrypt(&URL_SAFE.decode(token).unwrap()).unwrap();
    assert_eq!(
        String::from_utf8(plaintext).unwrap(),
        ThumborComposer.url_for(&options).unwrap()
    );
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(15)]
#[case(16)]
#[case(17)]
#[case(32)]
fn test_legacy_padding_lengths(#[case] length: usize) {
    let plaintext = "a".repeat(length);
    let crypto = CryptoUrl::with_composer(KEY, FixedComposer(plaintext.clone())).unwrap();

    let url = crypto
        .generate(&UrlOptions::new(IMAGE).with_old(true))
        .unwrap();
    let (token, _) = split_url(&url);
    let ciphertext = URL_SAFE.decode(token).unwrap();

    let fill = 16 - length % 16;
    assert_eq!(ciphertext.len(), length + fill);
    if length % 16 == 0 {
        assert_eq!(fill, 16);
    }

    let raw = raw_decrypt(&ciphertext);
    assert_eq!(&raw[..length], plaintext.as_bytes());
    assert!(raw[length..].iter().all(|b| *b == b'{'));
    assert_eq!(crypto.decrypt_old(token).unwrap(), plaintext);
}

#[test]
fn test_legacy_non_ascii_plaintext() {
    let path = "filters:watermark(ünïcödé.png)";
    let crypto = CryptoUrl::with_composer(KEY, FixedComposer(path.to_string())).unwrap();
    let url = crypto
        .generate(&UrlOptions::new(IMAGE).with_old(true))
        .unwrap();
    let (token, _) = split_url(&url);

    let ciphertext = URL_SAFE.decode(token).unwrap();
    assert_eq!(ciphertext.len() % 16, 0);
    assert!(ciphertext.len() > path.len());
    assert_eq!(crypto.decrypt_old(token).unwrap(), path);
}

#[rstest]
#[case("a")]
#[case("0123456789abcdef")]
#[case("a-key-that-is-longer-than-one-block")]
#[case("seven77")]
fn test_any_non_empty_key_length_works(#[case] key: &str) {
    let crypto = CryptoUrl::new(key).unwrap();
    let options = UrlOptions::new(IMAGE).with_size(10, 10);

    let old = crypto.generate(&options.clone().with_old(true)).unwrap();
    let (token, _) = split_url(&old);
    assert_eq!(
        crypto.decrypt_old(token).unwrap(),
        ThumborComposer.url_for(&options).unwrap()
    );

    let new = crypto.generate(&options).unwrap();
    assert!(crypto.validate_url(&new).is_ok());
}

#[test]
fn test_unsafe_ignores_key_material() {
    let options = UrlOptions::new(IMAGE).with_size(300, 200).with_unsafe(true);
    let a = CryptoUrl::new("one key").unwrap().generate(&options).unwrap();
    let b = CryptoUrl::new("another").unwrap().generate(&options).unwrap();

    assert_eq!(a, b);
    assert_eq!(a, format!("/unsafe/{}", ThumborComposer.plain_image_url(&options).unwrap()));
    assert_eq!(a, thumbor_url::unsafe_url(&options).unwrap());
}

#[test]
fn test_empty_key_is_configuration_error() {
    assert!(matches!(CryptoUrl::new(""), Err(Error::Configuration(_))));
}

#[test]
fn test_legacy_token_garbage_rejected() {
    let crypto = CryptoUrl::new(KEY).unwrap();
    assert!(matches!(
        crypto.decrypt_old("not base64!"),
        Err(Error::InvalidToken(_))
    ));
    assert!(matches!(
        crypto.decrypt_old(&URL_SAFE.encode([0u8; 10])),
        Err(Error::InvalidToken(_))
    ));
}

#[test]
fn test_concurrent_generation_does_not_cross_contaminate() {
    let crypto = Arc::new(CryptoUrl::new(KEY).unwrap());

    let handles: Vec<_> = (0..16u32)
        .map(|i| {
            let crypto = Arc::clone(&crypto);
            thread::spawn(move || {
                let options = UrlOptions::new(format!("host/image-{}.jpg", i))
                    .with_size(100 + i, 50 + i);
                let mut urls = Vec::new();
                for round in 0..50 {
                    let options = options.clone().with_old(round % 2 == 1);
                    urls.push((options.clone(), crypto.generate(&options).unwrap()));
                }
                urls
            })
        })
        .collect();

    let sequential = CryptoUrl::new(KEY).unwrap();
    for handle in handles {
        for (options, url) in handle.join().unwrap() {
            assert_eq!(url, sequential.generate(&options).unwrap());
            if !options.old {
                assert!(sequential.validate_url(&url).is_ok());
            }
        }
    }
}
