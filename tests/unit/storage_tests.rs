/*!
 * Tests for the object storage client
 */

use subpress::storage::ObjectStorageClient;

/// Test object URL construction from endpoint, bucket and object name
#[test]
fn test_object_url_withPlainEndpoint_shouldJoinBucketAndObject() {
    let client = ObjectStorageClient::new("http://localhost:9000", "videos", 30);
    let url = client.object_url("example.mp4").unwrap();

    assert_eq!(url.as_str(), "http://localhost:9000/videos/example.mp4");
}

/// Test an endpoint without a scheme defaults to https
#[test]
fn test_object_url_withSchemelessEndpoint_shouldDefaultToHttps() {
    let client = ObjectStorageClient::new("storage.example.com", "videos", 30);
    let url = client.object_url("clip.mp4").unwrap();

    assert_eq!(url.scheme(), "https");
    assert_eq!(url.host_str(), Some("storage.example.com"));
}

/// Test nested object names keep their path segments
#[test]
fn test_object_url_withNestedObjectName_shouldKeepSegments() {
    let client = ObjectStorageClient::new("http://localhost:9000", "videos", 30);
    let url = client.object_url("2024/raw/example.mp4").unwrap();

    assert!(url.path().ends_with("/videos/2024/raw/example.mp4"));
}

/// Test a download against an unreachable endpoint surfaces an error
#[tokio::test]
async fn test_download_withUnreachableEndpoint_shouldFail() {
    // Reserved TEST-NET-1 address, nothing listens there
    let client = ObjectStorageClient::new("http://192.0.2.1:9", "videos", 1);

    let result = client.download("example.mp4").await;
    assert!(result.is_err());
}
