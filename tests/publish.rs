//! End-to-end publish against a mocked GitHub API.

use kext_builder::builder::BuildResult;
use kext_builder::plugin::{CommitInfo, Plugin};
use kext_builder::publisher::{Manifest, Publisher, sha256};
use kext_builder::settings::SettingsBuilder;
use mockito::{Matcher, Server};
use serde_json::json;
use std::path::Path;
use std::time::Duration;

const SHA: &str = "abc1234def5678901234567890abcdef12345678";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04\x14\x00\x00\x00\x08\x00";

const PRIOR_MANIFEST: &str = r#"{
  "Foo": {
    "type": "Kext",
    "versions": [
      {
        "commit": {"sha": "abc1234def5678901234567890abcdef12345678", "message": "Old build"},
        "version": "1.0.0",
        "dateadded": "2023-05-01T10:00:00+00:00",
        "datecommitted": "2023-04-30T09:00:00+00:00",
        "source": "built",
        "release": {"id": 7, "url": "https://github.com/acme/builds/releases/tag/Foo-abc1234", "description": ""},
        "hashes": {"debug": {"sha256": "00"}, "release": {"sha256": "11"}},
        "links": {"debug": "https://example.com/old-d", "release": "https://example.com/old-r"}
      },
      {
        "commit": {"sha": "0000000111111122222223333333444444455555", "message": "Older build"},
        "version": "0.9.0",
        "dateadded": "2023-01-01T00:00:00+00:00",
        "datecommitted": "2023-01-01T00:00:00+00:00",
        "source": "built",
        "release": {"id": 3, "url": "https://github.com/acme/builds/releases/tag/Foo-0000000", "description": ""}
      }
    ]
  }
}"#;

fn write(path: &Path, bytes: &[u8]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

#[tokio::test]
async fn republishing_a_commit_replaces_release_and_record() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let mut server = Server::new_async().await;
    let base = server.url();

    let settings = SettingsBuilder::new()
        .root_dir(root)
        .api_base(&base)
        .repository("acme/builds")
        .account("bot")
        .deletion_delay(Duration::ZERO)
        .build()
        .unwrap();
    write(&settings.manifest_path(), PRIOR_MANIFEST.as_bytes());

    let out = root.join("Builds/Kexts/Foo").join(SHA);
    let debug = out.join("Debug/Foo-1.1.0-DEBUG.zip");
    let release = out.join("Release/Foo-1.1.0-RELEASE.zip");
    write(&debug, &[ZIP_MAGIC, b"debug"].concat());
    write(&release, &[ZIP_MAGIC, b"release"].concat());
    let notes = out.join("Debug/notes.txt");
    write(&notes, b"Built with Xcode 15\n");
    let debug_hash = sha256(&debug).await.unwrap();
    let release_hash = sha256(&release).await.unwrap();
    let notes_hash = sha256(&notes).await.unwrap();

    let release_json = json!({
        "id": 9,
        "name": "Foo abc1234",
        "tag_name": "Foo-abc1234",
        "html_url": "https://github.com/acme/builds/releases/tag/Foo-abc1234",
        "upload_url": format!("{base}/uploads/repos/acme/builds/releases/9/assets{{?name,label}}"),
    })
    .to_string();

    let list = server
        .mock("GET", "/repos/acme/builds/releases")
        .with_body(
            json!([
                {"id": 7, "name": "Foo abc1234", "html_url": "h7"},
                {"id": 8, "name": "Bar abc1234", "html_url": "h8"}
            ])
            .to_string(),
        )
        .create_async()
        .await;
    let delete_release = server
        .mock("DELETE", "/repos/acme/builds/releases/7")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let lookup_tag = server
        .mock("GET", "/repos/acme/builds/git/refs/tags/Foo-abc1234")
        .with_body(r#"{"ref": "refs/tags/Foo-abc1234"}"#)
        .create_async()
        .await;
    let delete_tag = server
        .mock("DELETE", "/repos/acme/builds/git/refs/tags/Foo-abc1234")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/repos/acme/builds/releases")
        .match_body(Matcher::PartialJson(json!({
            "tag_name": "Foo-abc1234",
            "target_commitish": "builds",
            "name": "Foo abc1234"
        })))
        .with_status(201)
        .with_body(&release_json)
        .expect(1)
        .create_async()
        .await;
    let _get = server
        .mock("GET", "/repos/acme/builds/releases/9")
        .with_body(&release_json)
        .create_async()
        .await;
    let upload = server
        .mock("POST", Matcher::Regex("^/uploads/repos/acme/builds/releases/9/assets".into()))
        .match_query(Matcher::Any)
        .match_header("content-type", "application/zip")
        .with_status(201)
        .with_body(r#"{"browser_download_url": "https://github.com/acme/builds/releases/download/Foo-abc1234/asset.zip"}"#)
        .expect(2)
        .create_async()
        .await;
    let upload_notes = server
        .mock("POST", Matcher::Regex("^/uploads/repos/acme/builds/releases/9/assets".into()))
        .match_query(Matcher::UrlEncoded("name".into(), "notes.txt".into()))
        .match_header("content-type", "text/plain")
        .with_status(201)
        .with_body(r#"{"browser_download_url": "https://github.com/acme/builds/releases/download/Foo-abc1234/notes.txt"}"#)
        .expect(1)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/repos/acme/builds/releases/9")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(debug_hash.clone()),
            Matcher::Regex(release_hash.clone()),
            Matcher::Regex(format!(r"Extras:\\n\\nnotes.txt: {notes_hash}")),
        ]))
        .with_body(&release_json)
        .expect(1)
        .create_async()
        .await;

    let plugin: Plugin =
        serde_json::from_value(json!({"Name": "Foo", "URL": "https://github.com/acme/Foo"})).unwrap();
    let commit: CommitInfo = serde_json::from_value(json!({
        "sha": SHA,
        "html_url": format!("https://github.com/acme/Foo/commit/{SHA}"),
        "commit": {"message": "Add feature\n", "committer": {"date": "2024-02-03T04:05:06Z"}}
    }))
    .unwrap();
    let build = BuildResult {
        debug: debug.clone(),
        release: release.clone(),
        extras: vec![notes.clone()],
        version: "1.1.0".to_string(),
        commit: SHA.to_string(),
    };

    let publisher = Publisher::new(&settings, "secret").unwrap();
    let record = publisher.add_built(&plugin, &commit, &build).await.unwrap();

    list.assert_async().await;
    delete_release.assert_async().await;
    lookup_tag.assert_async().await;
    delete_tag.assert_async().await;
    create.assert_async().await;
    upload.assert_async().await;
    upload_notes.assert_async().await;
    patch.assert_async().await;

    assert_eq!(record.release.id, 9);
    assert_eq!(record.hashes["debug"].sha256, debug_hash);
    assert_eq!(record.hashes["release"].sha256, release_hash);
    assert!(record.release.description.contains(&debug_hash));
    assert!(record.release.description.contains(&release_hash));
    assert_eq!(record.links.len(), 2);
    assert_eq!(record.hashes["notes.txt"].sha256, notes_hash);
    assert_eq!(
        record.extras["notes.txt"],
        "https://github.com/acme/builds/releases/download/Foo-abc1234/notes.txt"
    );
    assert!(
        record
            .release
            .description
            .contains(&format!("Extras:\n\nnotes.txt: {notes_hash}"))
    );

    let manifest = Manifest::load(&settings.manifest_path()).await.unwrap();
    let foo = manifest.get("Foo").unwrap();
    assert_eq!(foo.kind, "Kext");
    assert_eq!(foo.versions.len(), 2);
    assert_eq!(foo.versions[0].commit.sha, SHA);
    assert_eq!(foo.versions[0].version, "1.1.0");
    assert_eq!(foo.versions.iter().filter(|r| r.commit.sha == SHA).count(), 1);
    assert_eq!(foo.versions[1].version, "0.9.0");
}

#[tokio::test]
async fn failed_release_creation_leaves_manifest_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let mut server = Server::new_async().await;

    let settings = SettingsBuilder::new()
        .root_dir(tmp.path())
        .api_base(server.url())
        .repository("acme/builds")
        .deletion_delay(Duration::ZERO)
        .build()
        .unwrap();
    write(&settings.manifest_path(), PRIOR_MANIFEST.as_bytes());

    let _list = server
        .mock("GET", "/repos/acme/builds/releases")
        .with_body("[]")
        .create_async()
        .await;
    let _tag = server
        .mock("GET", "/repos/acme/builds/git/refs/tags/Foo-abc1234")
        .with_status(404)
        .create_async()
        .await;
    let _create = server
        .mock("POST", "/repos/acme/builds/releases")
        .with_status(422)
        .with_body(r#"{"message": "Validation Failed"}"#)
        .create_async()
        .await;

    let plugin: Plugin =
        serde_json::from_value(json!({"Name": "Foo", "URL": "https://github.com/acme/Foo"})).unwrap();
    let commit: CommitInfo = serde_json::from_value(json!({
        "sha": SHA,
        "html_url": format!("https://github.com/acme/Foo/commit/{SHA}"),
        "commit": {"message": "m", "committer": {"date": "2024-02-03T04:05:06Z"}}
    }))
    .unwrap();
    let debug = tmp.path().join("d.zip");
    let release = tmp.path().join("r.zip");
    write(&debug, ZIP_MAGIC);
    write(&release, ZIP_MAGIC);
    let build = BuildResult {
        debug,
        release,
        extras: Vec::new(),
        version: "1.1.0".to_string(),
        commit: SHA.to_string(),
    };

    let err = Publisher::new(&settings, "secret")
        .unwrap()
        .add_built(&plugin, &commit, &build)
        .await
        .unwrap_err();
    assert!(matches!(err, kext_builder::publisher::Error::Api { status: 422, .. }));

    let on_disk = std::fs::read_to_string(settings.manifest_path()).unwrap();
    assert_eq!(on_disk, PRIOR_MANIFEST);
}

#[tokio::test]
async fn directory_artifact_is_rejected_before_any_remote_call() {
    let tmp = tempfile::tempdir().unwrap();
    let mut server = Server::new_async().await;

    let settings = SettingsBuilder::new()
        .root_dir(tmp.path())
        .api_base(server.url())
        .repository("acme/builds")
        .deletion_delay(Duration::ZERO)
        .build()
        .unwrap();
    write(&settings.manifest_path(), PRIOR_MANIFEST.as_bytes());

    let list = server
        .mock("GET", "/repos/acme/builds/releases")
        .with_body("[]")
        .expect(0)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/repos/acme/builds/releases")
        .with_status(201)
        .expect(0)
        .create_async()
        .await;

    let plugin: Plugin =
        serde_json::from_value(json!({"Name": "Foo", "URL": "https://github.com/acme/Foo"})).unwrap();
    let commit: CommitInfo = serde_json::from_value(json!({
        "sha": SHA,
        "html_url": format!("https://github.com/acme/Foo/commit/{SHA}"),
        "commit": {"message": "m", "committer": {"date": "2024-02-03T04:05:06Z"}}
    }))
    .unwrap();
    let bundle = tmp.path().join("Debug/Foo.kext");
    write(&bundle.join("Contents/Info.plist"), b"<plist/>");
    let release = tmp.path().join("Release/Foo.zip");
    write(&release, ZIP_MAGIC);
    let build = BuildResult {
        debug: bundle.clone(),
        release,
        extras: Vec::new(),
        version: "1.1.0".to_string(),
        commit: SHA.to_string(),
    };

    let err = Publisher::new(&settings, "secret")
        .unwrap()
        .add_built(&plugin, &commit, &build)
        .await
        .unwrap_err();
    match err {
        kext_builder::publisher::Error::NotAFile(path) => assert_eq!(path, bundle),
        other => panic!("unexpected error: {other}"),
    }

    list.assert_async().await;
    create.assert_async().await;
    let on_disk = std::fs::read_to_string(settings.manifest_path()).unwrap();
    assert_eq!(on_disk, PRIOR_MANIFEST);
}
