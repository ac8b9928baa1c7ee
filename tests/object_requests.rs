//! Descriptor-level scenarios for object operations.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use cask_storage::api::object::{
    download, CreateSignedUrlRequest, GetObjectInfoRequest, ListObjectsRequest,
    ListObjectsV2Request, MoveObjectRequest, MovePayload, PublicUrlOptions, RemoveObjectsRequest,
    UploadRequest, UploadToSignedUrlRequest,
};
use cask_storage::api::{ApiRequest, Body, DecodePolicy, EntityCheck};
use cask_storage::schema::{FileOptions, ListV2Options, SearchOptions, TransformOptions};
use cask_storage::storage::SignedUrl;
use http::Method;
use serde_json::{json, Map, Value};
use url::Url;

fn base() -> Url {
    Url::parse("http://localhost:8000/storage/v1").unwrap()
}

fn json_body(body: &Body) -> &Value {
    match body {
        Body::Json(value) => value,
        other => panic!("expected a JSON body, got {other:?}"),
    }
}

#[test]
fn test_list_objects_body_with_defaults() {
    let descriptor = ListObjectsRequest {
        bucket_id: "avatars".to_string(),
        prefix: "avatars/".to_string(),
        options: SearchOptions::default(),
    }
    .descriptor(&base())
    .unwrap();

    assert_eq!(descriptor.method, Method::POST);
    assert_eq!(
        descriptor.full_url().as_str(),
        "http://localhost:8000/storage/v1/object/list/avatars"
    );
    assert_eq!(
        json_body(&descriptor.body),
        &json!({
            "prefix": "avatars/",
            "limit": 100,
            "offset": 0,
            "sort_by": {"column": "name", "order": "asc"},
        })
    );
    assert_eq!(
        descriptor.decode,
        DecodePolicy::Json {
            check: Some(EntityCheck::ObjectList)
        }
    );
}

#[test]
fn test_list_v2_body_is_cursor_based() {
    let descriptor = ListObjectsV2Request {
        bucket_id: "avatars".to_string(),
        prefix: Some("2024/".to_string()),
        options: ListV2Options {
            cursor: Some("opaque-token".to_string()),
            ..ListV2Options::default()
        },
    }
    .descriptor(&base())
    .unwrap();

    assert_eq!(
        descriptor.full_url().as_str(),
        "http://localhost:8000/storage/v1/object/list-v2/avatars"
    );
    assert_eq!(
        json_body(&descriptor.body),
        &json!({
            "prefix": "2024/",
            "limit": 100,
            "cursor": "opaque-token",
            "with_delimiter": false,
        })
    );
}

#[test]
fn test_upload_headers_follow_file_options() {
    let mut metadata = Map::new();
    metadata.insert("camera".to_string(), json!("X100"));
    let options = FileOptions {
        content_type: "image/png".to_string(),
        upsert: true,
        metadata,
        ..FileOptions::default()
    };
    let descriptor = UploadRequest {
        bucket_id: "avatars".to_string(),
        path: "/2024//me.png".to_string(),
        body: Bytes::from_static(b"png-bytes"),
        options,
    }
    .descriptor(&base())
    .unwrap();

    assert_eq!(descriptor.method, Method::POST);
    // the key is normalized into the route
    assert_eq!(
        descriptor.full_url().as_str(),
        "http://localhost:8000/storage/v1/object/avatars/2024/me.png"
    );
    let headers = &descriptor.headers;
    assert_eq!(
        headers.get("cache-control").map(|v| v.as_bytes()),
        Some(&b"max-age=3600"[..])
    );
    assert_eq!(
        headers.get("content-type").map(|v| v.as_bytes()),
        Some(&b"image/png"[..])
    );
    assert_eq!(
        headers.get("x-upsert").map(|v| v.as_bytes()),
        Some(&b"true"[..])
    );
    let encoded = headers.get("x-metadata").unwrap().to_str().unwrap();
    let decoded: Value = serde_json::from_slice(&STANDARD.decode(encoded).unwrap()).unwrap();
    assert_eq!(decoded, json!({"camera": "X100"}));
    match &descriptor.body {
        Body::Bytes(bytes) => assert_eq!(&bytes[..], b"png-bytes"),
        other => panic!("expected raw bytes, got {other:?}"),
    }
}

#[test]
fn test_upload_to_signed_url_puts_with_token() {
    let descriptor = UploadToSignedUrlRequest {
        bucket_id: "avatars".to_string(),
        path: "me.png".to_string(),
        token: "tok-123".to_string(),
        body: Bytes::from_static(b"data"),
        options: FileOptions::default(),
    }
    .descriptor(&base())
    .unwrap();

    assert_eq!(descriptor.method, Method::PUT);
    let url = descriptor.full_url();
    assert_eq!(
        url.path(),
        "/storage/v1/object/upload/sign/avatars/me.png"
    );
    assert_eq!(url.query(), Some("token=tok-123"));
}

#[test]
fn test_move_normalizes_both_keys() {
    let descriptor = MoveObjectRequest {
        payload: MovePayload {
            bucket_id: "avatars".to_string(),
            source_key: "/old//me.png".to_string(),
            destination_key: "new/me.png/".to_string(),
            destination_bucket: None,
        },
    }
    .descriptor(&base())
    .unwrap();

    assert_eq!(
        descriptor.full_url().as_str(),
        "http://localhost:8000/storage/v1/object/move"
    );
    assert_eq!(
        json_body(&descriptor.body),
        &json!({
            "bucket_id": "avatars",
            "source_key": "old/me.png",
            "destination_key": "new/me.png",
        })
    );
}

#[test]
fn test_remove_sends_normalized_prefixes() {
    let descriptor = RemoveObjectsRequest {
        bucket_id: "avatars".to_string(),
        prefixes: vec!["/a.png".to_string(), "b//c.png".to_string()],
    }
    .descriptor(&base())
    .unwrap();

    assert_eq!(descriptor.method, Method::DELETE);
    assert_eq!(
        json_body(&descriptor.body),
        &json!({"prefixes": ["a.png", "b/c.png"]})
    );
}

#[test]
fn test_info_checks_the_object_schema() {
    let descriptor = GetObjectInfoRequest {
        bucket_id: "avatars".to_string(),
        path: "me.png".to_string(),
    }
    .descriptor(&base())
    .unwrap();
    assert_eq!(
        descriptor.full_url().as_str(),
        "http://localhost:8000/storage/v1/object/info/avatars/me.png"
    );
    assert_eq!(
        descriptor.decode,
        DecodePolicy::Json {
            check: Some(EntityCheck::Object)
        }
    );
}

#[test]
fn test_signed_url_request_embeds_transform() {
    let descriptor = CreateSignedUrlRequest {
        bucket_id: "avatars".to_string(),
        path: "me.png".to_string(),
        expires_in: 60,
        transform: Some(TransformOptions {
            width: Some(100),
            ..TransformOptions::default()
        }),
    }
    .descriptor(&base())
    .unwrap();

    assert_eq!(
        descriptor.full_url().as_str(),
        "http://localhost:8000/storage/v1/object/sign/avatars/me.png"
    );
    assert_eq!(
        json_body(&descriptor.body),
        &json!({
            "expiresIn": 60,
            "transform": {"width": 100, "resize": "cover", "quality": 80, "format": "origin"},
        })
    );
}

#[test]
fn test_signed_url_token_extraction() {
    let signed = SignedUrl::from_relative(
        &base(),
        "/object/sign/avatars/me.png?token=abc123",
    )
    .unwrap();
    assert_eq!(signed.token, "abc123");
    assert_eq!(
        signed.url.as_str(),
        "http://localhost:8000/storage/v1/object/sign/avatars/me.png?token=abc123"
    );

    assert!(SignedUrl::from_relative(&base(), "/object/sign/avatars/me.png").is_err());
}

#[test]
fn test_download_descriptor_derives_accept_from_key() {
    let descriptor = download::descriptor(&base(), "avatars", "me.png", None).unwrap();
    assert_eq!(descriptor.method, Method::GET);
    assert_eq!(descriptor.decode, DecodePolicy::Raw);
    assert_eq!(
        descriptor.full_url().as_str(),
        "http://localhost:8000/storage/v1/object/avatars/me.png"
    );
    assert_eq!(
        descriptor.headers.get("accept").map(|v| v.as_bytes()),
        Some(&b"image/png"[..])
    );
}

#[test]
fn test_transformed_download_goes_through_render() {
    let transform = TransformOptions {
        width: Some(100),
        height: Some(80),
        ..TransformOptions::default()
    };
    let descriptor = download::descriptor(&base(), "avatars", "me.png", Some(&transform)).unwrap();
    let url = descriptor.full_url();
    assert_eq!(
        url.path(),
        "/storage/v1/render/image/authenticated/avatars/me.png"
    );
    let query = url.query().unwrap();
    assert!(query.contains("width=100"));
    assert!(query.contains("height=80"));
    assert!(query.contains("quality=80"));
}

#[test]
fn test_public_url_needs_no_request() {
    let plain = download::public_url(&base(), "avatars", "/me.png", &PublicUrlOptions::default())
        .unwrap();
    assert_eq!(
        plain.as_str(),
        "http://localhost:8000/storage/v1/object/public/avatars/me.png"
    );

    let options = PublicUrlOptions {
        download: Some("portrait.png".to_string()),
        transform: Some(TransformOptions {
            width: Some(64),
            ..TransformOptions::default()
        }),
    };
    let rendered = download::public_url(&base(), "avatars", "me.png", &options).unwrap();
    assert_eq!(
        rendered.path(),
        "/storage/v1/render/image/public/avatars/me.png"
    );
    let query = rendered.query().unwrap();
    assert!(query.contains("width=64"));
    assert!(query.contains("download=portrait.png"));
}
