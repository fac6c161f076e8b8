// Integration tests for descriptor access
//
// Tests cover:
// - Exactly one transport fetch across repeated and concurrent access
// - Retry after a failed load
// - Absent keys
// - The compiled-in standard descriptor set

use jcr::jcr_protocol::descriptor::{STANDARD_DESCRIPTORS, keys};
use jcr::jcr_runtime::FakeTransport;
use jcr::{DescriptorValue, ErrorKind, Repository};
use std::time::Duration;

#[tokio::test]
async fn test_descriptors_loaded_once() -> anyhow::Result<()> {
    let transport = FakeTransport::builder()
        .descriptor(keys::REP_NAME_DESC, "Acme Repository")
        .descriptor(keys::SPEC_VERSION_DESC, "2.0")
        .build();
    let repository = Repository::new(None, Some(transport.clone()), None);

    assert_eq!(transport.descriptor_calls(), 0);

    for _ in 0..5 {
        let names = repository.descriptor_keys().await?;
        assert_eq!(names, vec!["jcr.repository.name", "jcr.specification.version"]);
        assert_eq!(
            repository.descriptor(keys::SPEC_VERSION_DESC).await?,
            Some(DescriptorValue::from("2.0"))
        );
    }

    assert_eq!(transport.descriptor_calls(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_access_loads_once() -> anyhow::Result<()> {
    let transport = FakeTransport::builder()
        .descriptor("repository.vendor", vec!["Acme", "Test"])
        .descriptor_delay(Duration::from_millis(50))
        .build();
    let repository = Repository::new(None, Some(transport.clone()), None);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let repository = repository.clone();
            tokio::spawn(async move { repository.descriptor_keys().await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await??, vec!["repository.vendor"]);
    }
    assert_eq!(transport.descriptor_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_load_is_retried() -> anyhow::Result<()> {
    let transport = FakeTransport::builder()
        .descriptor("identifier.stable", "true")
        .fail_descriptors(2)
        .build();
    let repository = Repository::new(None, Some(transport.clone()), None);

    let err = repository.descriptor_keys().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Repository);
    let err = repository.descriptor("identifier.stable").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Repository);

    assert_eq!(repository.descriptor_keys().await?, vec!["identifier.stable"]);
    assert_eq!(repository.descriptor_keys().await?, vec!["identifier.stable"]);
    assert_eq!(transport.descriptor_calls(), 3);
    Ok(())
}

#[tokio::test]
async fn test_absent_key_is_none() -> anyhow::Result<()> {
    let transport = FakeTransport::builder()
        .descriptor("identifier.stable", "true")
        .build();
    let repository = Repository::new(None, Some(transport), None);

    assert_eq!(repository.descriptor("nonexistent-key").await?, None);
    assert_eq!(repository.descriptor("").await?, None);
    Ok(())
}

#[tokio::test]
async fn test_empty_descriptor_table() -> anyhow::Result<()> {
    let transport = FakeTransport::builder().build();
    let repository = Repository::new(None, Some(transport.clone()), None);

    assert!(repository.descriptor_keys().await?.is_empty());
    assert!(repository.descriptor_keys().await?.is_empty());
    assert_eq!(transport.descriptor_calls(), 1);
    Ok(())
}

#[test]
fn test_standard_descriptors() {
    let repository = Repository::new(None, None, None);

    for key in STANDARD_DESCRIPTORS {
        assert!(repository.is_standard_descriptor(key), "{}", key);
    }
    assert!(repository.is_standard_descriptor(keys::QUERY_LANGUAGES));
    assert!(repository.is_standard_descriptor("node.type.management.update.in.use.suported"));

    for value in [
        "identifier.stability.method.duration",
        "identifier.stability.save.duration",
        "identifier.stability.session.duration",
        "identifier.stability.indefinite.duration",
        "node.type.management.inheritance.minimal",
        "node.type.management.inheritance.single",
        "node.type.management.inheritance.multiple",
        "query.joins.none",
        "query.joins.inner",
        "query.joins.inner.outer",
    ] {
        assert!(repository.is_standard_descriptor(value), "{}", value);
    }

    assert!(!repository.is_standard_descriptor(""));
    assert!(!repository.is_standard_descriptor("repository.vendor"));
    assert!(!repository.is_standard_descriptor("Jcr.Repository.Vendor"));
    assert!(!repository.is_standard_descriptor("jcr.repository.vendor "));
}
