//! Typed clients talking to the server codec in-process.

use std::collections::BTreeMap;
use std::sync::Mutex;

use assert2::{check, let_assert};
use kestrel::aspect::{
    AspectClient, AspectHandler, AspectIdResult, AspectListItem, AspectListResult, AspectRT,
    AspectService, CreateAspectPayload, ListAspectsPayload, ReadAspectPayload,
    RetractAspectPayload,
};
use kestrel::links::Links;
use kestrel::secret::{
    GetSecretPayload, ListSecretsPayload, SecretClient, SecretDescriptor, SecretHandler,
    SecretListItem, SecretListResult, SecretResult, SecretService, SetSecretPayload,
};
use kestrel::{ApiClient, Context, Error, JwtScheme, Loopback, ServiceError};

const BASE: &str = "http://kestrel.test";

#[derive(Debug, Clone, PartialEq)]
struct Caller(String);

/// Tokens look like `<caller>:<scope>,<scope>`.
fn authenticate(context: Context, token: &str, scheme: &JwtScheme) -> Result<Context, ServiceError> {
    let Some((caller, scopes)) = token.split_once(':') else {
        return Err(ServiceError::NotAuthorized);
    };
    let granted: Vec<&str> = scopes.split(',').collect();
    let missing = scheme.missing_scopes(&granted);
    if !missing.is_empty() {
        return Err(ServiceError::invalid_scopes(format!("missing scopes {missing:?}")));
    }
    Ok(context.with(Caller(caller.to_string())))
}

#[derive(Default)]
struct Aspects {
    store: Mutex<BTreeMap<String, AspectRT>>,
}

impl AspectService for Aspects {
    async fn list(&self, _: &Context, payload: ListAspectsPayload) -> Result<AspectListResult, ServiceError> {
        let store = self.store.lock().map_err(|_| ServiceError::NotAvailable)?;
        let limit = usize::try_from(payload.limit).unwrap_or_default();
        let items = store
            .values()
            .filter(|aspect| payload.entity.as_ref().is_none_or(|entity| *entity == aspect.entity))
            .take(limit)
            .map(|aspect| AspectListItem {
                id: aspect.id.clone(),
                entity: aspect.entity.clone(),
                schema: aspect.schema.clone(),
                content: None,
                content_type: None,
            })
            .collect();
        Ok(AspectListResult {
            items,
            entity: payload.entity,
            schema: payload.schema,
            aspect_path: None,
            at_time: None,
            links: Links::single(format!("{BASE}/1/aspects?limit={limit}")),
        })
    }

    async fn read(&self, _: &Context, payload: ReadAspectPayload) -> Result<AspectRT, ServiceError> {
        let store = self.store.lock().map_err(|_| ServiceError::NotAvailable)?;
        store
            .get(&payload.id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(payload.id, "no such aspect"))
    }

    async fn create(&self, context: &Context, payload: CreateAspectPayload) -> Result<AspectIdResult, ServiceError> {
        let content = serde_json::from_slice(&payload.content)
            .map_err(|err| ServiceError::invalid_parameter("content", None, err.to_string()))?;
        let mut store = self.store.lock().map_err(|_| ServiceError::NotAvailable)?;
        let id = format!("urn:kestrel:aspect:{}", store.len() + 1);
        if let Some(existing) = store
            .values()
            .find(|aspect| aspect.entity == payload.entity && aspect.schema == payload.schema)
        {
            return Err(ServiceError::already_created(existing.id.clone(), "aspect exists"));
        }
        store.insert(
            id.clone(),
            AspectRT {
                id: id.clone(),
                entity: payload.entity,
                schema: payload.schema,
                content: Some(content),
                content_type: Some(payload.content_type),
                valid_from: Some("2024-05-01T10:00:00Z".to_string()),
                valid_to: None,
                asserter: context.get::<Caller>().map(|caller| caller.0.clone()),
                retracter: None,
            },
        );
        Ok(AspectIdResult { id })
    }

    async fn retract(&self, _: &Context, payload: RetractAspectPayload) -> Result<(), ServiceError> {
        let mut store = self.store.lock().map_err(|_| ServiceError::NotAvailable)?;
        store
            .remove(&payload.id)
            .map(drop)
            .ok_or_else(|| ServiceError::not_found(payload.id, "no such aspect"))
    }
}

#[derive(Default)]
struct Secrets {
    store: Mutex<BTreeMap<String, SecretDescriptor>>,
}

impl SecretService for Secrets {
    async fn list(&self, _: &Context, payload: ListSecretsPayload) -> Result<SecretListResult, ServiceError> {
        let store = self.store.lock().map_err(|_| ServiceError::NotAvailable)?;
        let offset = payload.offset.and_then(|offset| usize::try_from(offset).ok()).unwrap_or_default();
        let limit = usize::try_from(payload.limit).unwrap_or_default();
        Ok(SecretListResult {
            items: store
                .values()
                .skip(offset)
                .take(limit)
                .map(|secret| SecretListItem {
                    secret_name: secret.secret_name.clone(),
                    expiry_time: secret.expiry_time,
                })
                .collect(),
            links: Links::single(format!("{BASE}/1/secrets?offset={offset}&limit={limit}")),
        })
    }

    async fn get(&self, _: &Context, payload: GetSecretPayload) -> Result<SecretResult, ServiceError> {
        let store = self.store.lock().map_err(|_| ServiceError::NotAvailable)?;
        let secret = store
            .get(&payload.name)
            .filter(|secret| payload.secret_type.is_none() || secret.secret_type == payload.secret_type)
            .ok_or_else(|| ServiceError::not_found(payload.name.clone(), "no such secret"))?;
        Ok(SecretResult {
            secret_name: secret.secret_name.clone(),
            secret_value: Some(secret.secret_value.clone()),
            expiry_time: Some(secret.expiry_time),
        })
    }

    async fn set(&self, _: &Context, payload: SetSecretPayload) -> Result<(), ServiceError> {
        let mut store = self.store.lock().map_err(|_| ServiceError::NotAvailable)?;
        store.insert(payload.secret.secret_name.clone(), payload.secret);
        Ok(())
    }
}

fn aspects() -> AspectClient<Loopback<impl kestrel::Handler>> {
    let handler = AspectHandler::new(Aspects::default(), authenticate);
    AspectClient::new(ApiClient::new(Loopback::new(handler), BASE).expect("valid url"))
}

fn secrets() -> SecretClient<Loopback<impl kestrel::Handler>> {
    let handler = SecretHandler::new(Secrets::default(), authenticate);
    SecretClient::new(ApiClient::new(Loopback::new(handler), BASE).expect("valid url"))
}

fn create_payload(jwt: &str) -> CreateAspectPayload {
    CreateAspectPayload {
        entity: "urn:kestrel:entity:1".to_string(),
        schema: "urn:kestrel:schema:profile".to_string(),
        policy: None,
        content_type: "application/json".to_string(),
        content: bytes::Bytes::from_static(br#"{"name":"Ada","nested":{"deep":[true,null]}}"#),
        jwt: jwt.to_string(),
    }
}

#[tokio::test]
async fn aspect_lifecycle() {
    let client = aspects();

    let created = client
        .create(&create_payload("alice:aspect:write"))
        .await
        .expect("create");
    assert_eq!(created.id, "urn:kestrel:aspect:1");

    let read = ReadAspectPayload {
        id: created.id.clone(),
        view: None,
        jwt: "bob:aspect:read".to_string(),
    };
    let aspect = client.read(&read).await.expect("read");
    assert_eq!(aspect.asserter.as_deref(), Some("alice"));
    assert_eq!(
        aspect.content,
        Some(serde_json::json!({"name": "Ada", "nested": {"deep": [true, null]}}))
    );

    let tiny = client
        .read(&ReadAspectPayload {
            view: Some("tiny".to_string()),
            ..read.clone()
        })
        .await
        .expect("tiny read");
    assert_eq!(tiny.schema, "urn:kestrel:schema:profile");
    check!(tiny.content.is_none());

    let page = client
        .list(&ListAspectsPayload {
            jwt: "bob:aspect:read".to_string(),
            ..ListAspectsPayload::default()
        })
        .await
        .expect("list");
    assert_eq!(page.items.len(), 1);
    check!(url::Url::parse(&page.links.self_link).is_ok());

    let retract = RetractAspectPayload {
        id: created.id,
        jwt: "alice:aspect:write".to_string(),
    };
    client.retract(&retract).await.expect("retract");

    let err = client.read(&read).await.expect_err("retracted");
    assert_eq!(err.kind(), Some("not-found"));
}

#[tokio::test]
async fn duplicate_create_is_already_created() {
    let client = aspects();
    client.create(&create_payload("alice:aspect:write")).await.expect("create");

    let err = client
        .create(&create_payload("alice:aspect:write"))
        .await
        .expect_err("duplicate");
    let_assert!(Error::Service(ServiceError::AlreadyCreated { id, .. }) = err);
    assert_eq!(id, "urn:kestrel:aspect:1");
}

#[tokio::test]
async fn scopes_are_enforced() {
    let err = aspects()
        .create(&create_payload("bob:aspect:read"))
        .await
        .expect_err("read scope only");
    let_assert!(Error::Service(ServiceError::InvalidScopes { message, .. }) = err);
    assert_eq!(message, r#"missing scopes ["aspect:write"]"#);

    let err = aspects()
        .list(&ListAspectsPayload::default())
        .await
        .expect_err("no token");
    assert_eq!(err.service_error(), Some(&ServiceError::NotAuthorized));
}

#[tokio::test]
async fn secret_views_round_trip() {
    let client = secrets();
    let secret = SecretDescriptor {
        secret_name: "db".to_string(),
        secret_type: Some("password".to_string()),
        secret_value: "hunter2".to_string(),
        expiry_time: 1_700_000_000,
    };
    client
        .set(&SetSecretPayload {
            secret,
            jwt: "ops:secret:write".to_string(),
        })
        .await
        .expect("set");

    let get = GetSecretPayload {
        name: "db".to_string(),
        secret_type: Some("password".to_string()),
        view: None,
        jwt: "ops:secret:read".to_string(),
    };
    let full = client.get(&get).await.expect("get");
    assert_eq!(
        full,
        SecretResult {
            secret_name: "db".to_string(),
            secret_value: Some("hunter2".to_string()),
            expiry_time: Some(1_700_000_000),
        }
    );

    let name_only = client
        .get(&GetSecretPayload {
            view: Some("name-only".to_string()),
            ..get.clone()
        })
        .await
        .expect("name-only get");
    assert_eq!(name_only.secret_name, "db");
    check!(name_only.secret_value.is_none());

    let page = client
        .list(&ListSecretsPayload {
            jwt: "ops:secret:read".to_string(),
            ..ListSecretsPayload::default()
        })
        .await
        .expect("list");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.links.self_link, format!("{BASE}/1/secrets?offset=0&limit=10"));
}

#[tokio::test]
async fn secret_type_mismatch_is_not_found() {
    let client = secrets();
    let err = client
        .get(&GetSecretPayload {
            name: "missing".to_string(),
            jwt: "ops:secret:read".to_string(),
            ..GetSecretPayload::default()
        })
        .await
        .expect_err("missing");
    let_assert!(Error::Service(ServiceError::NotFound { id, message }) = err);
    assert_eq!(id, "missing");
    assert_eq!(message, "no such secret");
}
