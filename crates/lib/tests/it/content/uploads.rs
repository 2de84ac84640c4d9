//! Image uploads through the local blob store.

use folio::{
    FixedClock,
    backend::blob::LocalBlobStore,
    constants::IMAGE_BUCKET,
    content::{UploadRequest, upload_image},
};
use url::Url;

#[tokio::test]
async fn uploaded_image_is_served_from_the_returned_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(
        dir.path(),
        IMAGE_BUCKET,
        Url::parse("https://example.com/files/").unwrap(),
    );
    let clock = FixedClock::new(1_700_000_000_000);
    let request =
        UploadRequest::prepare("about", "studio.png", "image/png", 4, &clock).unwrap();

    let url = upload_image(&store, &request, vec![0x89, b'P', b'N', b'G'])
        .await
        .unwrap();

    assert_eq!(
        url,
        format!("https://example.com/files/images/{}", request.path())
    );
    let on_disk = std::fs::read(dir.path().join(IMAGE_BUCKET).join(request.path())).unwrap();
    assert_eq!(on_disk, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn oversized_bodies_are_refused_before_storing() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(
        dir.path(),
        IMAGE_BUCKET,
        Url::parse("https://example.com/").unwrap(),
    );
    let request = UploadRequest::prepare("a", "x.png", "image/png", 1, &FixedClock::default())
        .unwrap();
    let body = vec![0u8; (folio::constants::MAX_UPLOAD_BYTES + 1) as usize];

    let err = upload_image(&store, &request, body).await.unwrap_err();
    assert!(err.is_validation_error());
    assert!(!dir.path().join(IMAGE_BUCKET).exists());
}
