use jcr_protocol::{Credentials, DescriptorValue, Descriptors};

use super::*;

/// Implements only the required methods.
struct MinimalTransport;

impl Transport for MinimalTransport {
	fn login<'a>(
		&'a self,
		credentials: Option<&'a Credentials>,
		workspace_name: &'a str,
	) -> TransportFuture<'a, bool> {
		Box::pin(async move {
			Ok(credentials.and_then(Credentials::user_id) == Some("admin")
				&& workspace_name == "default")
		})
	}

	fn repository_descriptors(&self) -> TransportFuture<'_, Descriptors> {
		Box::pin(async {
			let mut descriptors = Descriptors::new();
			descriptors.insert("write.supported".to_string(), DescriptorValue::from("true"));
			Ok(descriptors)
		})
	}
}

#[tokio::test]
async fn test_required_methods() {
	let transport = MinimalTransport;
	let admin = Credentials::simple("admin", "admin");

	assert!(transport.login(Some(&admin), "default").await.unwrap());
	assert!(!transport.login(None, "default").await.unwrap());

	let descriptors = transport.repository_descriptors().await.unwrap();
	assert_eq!(descriptors.len(), 1);
}

#[tokio::test]
async fn test_default_logout_succeeds() {
	MinimalTransport.logout().await.unwrap();
}

#[tokio::test]
async fn test_default_binary_stream_is_unsupported() {
	let err = MinimalTransport
		.binary_stream("/content/file/jcr:data")
		.await
		.unwrap_err();

	match err {
		Error::Unsupported(message) => assert!(message.contains("/content/file/jcr:data")),
		other => panic!("Expected Unsupported, got: {:?}", other),
	}
}

#[test]
fn test_default_has_no_transaction_capability() {
	assert!(MinimalTransport.transactional().is_none());
}

#[test]
fn test_transport_is_object_safe() {
	let transport: Box<dyn Transport> = Box::new(MinimalTransport);
	assert!(transport.transactional().is_none());
}
