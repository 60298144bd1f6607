use super::*;

#[test]
fn mime_follows_extension() {
    assert_eq!(mime_for(Path::new("a.PNG")), "image/png");
    assert_eq!(mime_for(Path::new("a.jpeg")), "image/jpeg");
    assert_eq!(mime_for(Path::new("a_result.svg")), "image/svg+xml");
    assert_eq!(mime_for(Path::new("a_animation.gif")), "image/gif");
    assert_eq!(mime_for(Path::new("a")), "application/octet-stream");
}

#[test]
fn data_uri_is_base64_with_mime_prefix() {
    let art = Artifact::new("cat_animation.gif", b"GIF89a".to_vec());
    assert_eq!(art.data_uri(), "data:image/gif;base64,R0lGODlh");
    assert_eq!(art.len(), 6);
}

#[test]
fn load_reads_bytes_and_survives_source_removal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cat_result.png");
    std::fs::write(&path, b"\x89PNG").unwrap();

    let art = Artifact::load(&path).unwrap();
    drop(dir);

    assert_eq!(art.file_name, "cat_result.png");
    assert_eq!(art.mime, "image/png");
    assert_eq!(art.bytes, b"\x89PNG");
}

#[test]
fn load_of_missing_file_is_an_artifact_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Artifact::load(&dir.path().join("missing.png")).unwrap_err();
    assert!(matches!(err, ArtError::Artifact(_)), "{err}");
}

#[test]
fn save_into_creates_the_directory() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("outputs");
    let art = Artifact::new("x_result.svg", b"<svg/>".to_vec());
    let saved = art.save_into(&out).unwrap();
    assert_eq!(saved, out.join("x_result.svg"));
    assert_eq!(std::fs::read(saved).unwrap(), b"<svg/>");
}
