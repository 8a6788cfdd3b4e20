//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::master_key::MasterKey;
use crate::auth_common::signer;
use crate::mock_transport::{throttled, MockTransport, TEST_KEY};
use crate::transport::{HttpResponse, SignedRequest};
use crate::types::{Collection, Database, Document};
use crate::{
    Account, CreateRequest, DatabaseDefinition, DeleteRequest, DocumentDBError,
    DocumentDBErrorCode, DocumentDefinition, ExecuteStoredProcedureRequest, GetRequest,
    ListRequest, DEFAULT_MAX_ATTEMPTS,
};
use serde_json::json;
use std::error::Error;
use std::result::Result;

const DB_BODY: &str = r#"{"id":"todo","_rid":"AbC=","_ts":1493254272,"_self":"dbs/AbC=/","_etag":"\"00000400-0000-0000-0000-590147800000\"","_colls":"colls/","_users":"users/"}"#;

fn collection() -> Result<Collection, DocumentDBError> {
    crate::resource::decode_resource(
        br#"{"id":"items","_rid":"AbC=Xy1=","_self":"dbs/AbC=/colls/AbC=Xy1=/"}"#,
    )
}

// Check that the Authorization header is the signature of the request's own date.
fn assert_signed(req: &SignedRequest, resource_type: &str, resource_id: &str) {
    let key = MasterKey::from_base64(TEST_KEY).unwrap();
    let date = req.header("x-ms-date").unwrap();
    let sig = signer::sign(req.method.as_str(), resource_type, resource_id, date, &key).unwrap();
    assert_eq!(
        req.header("authorization").unwrap(),
        signer::authorization_header(&sig)
    );
}

#[tokio::test(start_paused = true)]
async fn test_throttled_create_gives_up_at_ceiling() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new().respond_always(throttled(10));
    let handle = mock.handle()?;
    let err = CreateRequest::new(&Account, DatabaseDefinition::new("todo"))
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(mock.send_count(), DEFAULT_MAX_ATTEMPTS as usize);
    assert_eq!(err.code, DocumentDBErrorCode::ServerError);
    assert_eq!(err.status, Some(429));
    assert_eq!(err.server_code, "TooManyRequests");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_throttled_create_then_success() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new()
        .respond(throttled(25))
        .respond(HttpResponse::new(201, DB_BODY));
    let handle = mock.handle()?;
    let start = tokio::time::Instant::now();
    let db: Database = CreateRequest::new(&Account, DatabaseDefinition::new("todo"))
        .execute(&handle)
        .await?;
    assert!(start.elapsed() >= std::time::Duration::from_millis(25));
    assert_eq!(mock.send_count(), 2);
    assert_eq!(db.id(), "todo");
    assert_eq!(db.resource_id(), "AbC=");
    assert_eq!(db.self_link(), "dbs/AbC=/");
    assert_eq!(db.collections_link(), "colls/");

    // every attempt is signed on its own, against its own date
    let sent = mock.sent();
    for req in &sent {
        assert_eq!(req.method, reqwest::Method::POST);
        assert_eq!(req.url.as_str(), "https://acct.documents.azure.com/dbs");
        assert_signed(req, "dbs", "");
        assert_eq!(req.body, sent[0].body);
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_lower_attempt_ceiling() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new().respond_always(throttled(1));
    let handle = crate::Handle::builder()
        .endpoint(crate::mock_transport::TEST_ENDPOINT)?
        .master_key(TEST_KEY)?
        .max_attempts(3)?
        .transport(mock.clone())?
        .build()?;
    let coll = collection()?;
    let err = DeleteRequest::<Document>::new(&coll, "AbC=Xy1=AAAAAA==")
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, DocumentDBErrorCode::ServerError);
    assert_eq!(mock.send_count(), 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_reads_are_not_retried() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new().respond_always(throttled(10));
    let handle = mock.handle()?;
    let err = GetRequest::<Database>::new(&Account, "AbC=")
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, DocumentDBErrorCode::ServerError);
    assert_eq!(err.status, Some(429));
    assert_eq!(mock.send_count(), 1);

    let err = ListRequest::<Database>::new(&Account)
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, DocumentDBErrorCode::ServerError);
    assert_eq!(mock.send_count(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_throttle_without_retry_after() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new()
        .respond(HttpResponse::new(429, "slow down"))
        .respond(HttpResponse::new(201, DB_BODY));
    let handle = mock.handle()?;
    let err = CreateRequest::new(&Account, DatabaseDefinition::new("todo"))
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, DocumentDBErrorCode::ServerError);
    assert_eq!(err.message, "slow down");
    assert_eq!(mock.send_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_document_retry_keeps_generated_id() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new()
        .respond(throttled(5))
        .respond(HttpResponse::new(
            201,
            r#"{"id":"x","_rid":"AbC=Xy1=AAAAAA==","name":"n"}"#,
        ));
    let handle = mock.handle()?;
    let coll = collection()?;
    let def = DocumentDefinition::new(json!({"name": "n"}));
    let doc = CreateRequest::new(&coll, def).execute(&handle).await?;
    assert_eq!(doc.payload()["name"], "n");
    let sent = mock.sent();
    assert_eq!(sent.len(), 2);
    let first: serde_json::Value = serde_json::from_slice(&sent[0].body)?;
    let second: serde_json::Value = serde_json::from_slice(&sent[1].body)?;
    assert!(first["id"].is_string());
    assert_eq!(first["id"], second["id"]);
    for req in &sent {
        assert_eq!(
            req.url.as_str(),
            "https://acct.documents.azure.com/dbs/AbC=/colls/AbC=Xy1=/docs"
        );
        assert_signed(req, "docs", "AbC=Xy1=");
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_stored_procedure_retry() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new()
        .respond(throttled(5))
        .respond(HttpResponse::new(200, r#"{"greeting":"hello"}"#))
        .respond(HttpResponse::new(200, ""));
    let handle = mock.handle()?;
    let coll = collection()?;
    let out = ExecuteStoredProcedureRequest::new(&coll, "AbC=Xy1=AgAAAA==")
        .input(json!(["hello"]))
        .execute(&handle)
        .await?;
    assert_eq!(out, json!({"greeting": "hello"}));
    let sent = mock.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[1].url.as_str(),
        "https://acct.documents.azure.com/dbs/AbC=/colls/AbC=Xy1=/sprocs/AbC=Xy1=AgAAAA=="
    );
    assert_eq!(sent[1].body.as_ref(), br#"["hello"]"#);
    assert_signed(&sent[1], "sprocs", "AbC=Xy1=AgAAAA==");

    let out = ExecuteStoredProcedureRequest::new(&coll, "AbC=Xy1=AgAAAA==")
        .execute(&handle)
        .await?;
    assert!(out.is_null());
    assert_eq!(mock.sent()[2].body.as_ref(), b"[]");
    Ok(())
}

#[tokio::test]
async fn test_error_classification() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new()
        .respond(HttpResponse::new(
            404,
            r#"{"code":"NotFound","message":"Resource Not Found"}"#,
        ))
        .respond(HttpResponse::new(409, r#"{"code":"X","message":"Y"}"#))
        .respond(HttpResponse::new(413, r#"{"message":"too big"}"#))
        .respond(HttpResponse::new(500, "<html>oops</html>"))
        .respond(HttpResponse::new(200, DB_BODY));
    let handle = mock.handle()?;

    let err = GetRequest::<Database>::new(&Account, "AbC=")
        .execute(&handle)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status, Some(404));
    assert_eq!(err.message, "Resource Not Found");

    let err = CreateRequest::new(&Account, DatabaseDefinition::new("todo"))
        .execute(&handle)
        .await
        .unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(err.server_code, "X");
    assert_eq!(err.message, "Y");

    let coll = collection()?;
    let err = CreateRequest::new(&coll, DocumentDefinition::new(json!({"id": "big"})))
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, DocumentDBErrorCode::TooLarge);
    assert_eq!(err.server_code, "");
    assert_eq!(err.message, "too big");

    let err = DeleteRequest::<Database>::new(&Account, "AbC=")
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, DocumentDBErrorCode::ServerError);
    assert_eq!(err.message, "<html>oops</html>");

    // a success status other than the expected one is still an error
    let err = DeleteRequest::<Database>::new(&Account, "AbC=")
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, DocumentDBErrorCode::ServerError);
    assert_eq!(err.status, Some(200));
    Ok(())
}

#[test]
fn test_classify_statuses() {
    let e = DocumentDBError::classify(404, b"");
    assert_eq!(e.code, DocumentDBErrorCode::NotFound);
    assert_eq!(e.message, "");
    let e = DocumentDBError::classify(409, br#"{"code":"Conflict"}"#);
    assert_eq!(e.code, DocumentDBErrorCode::AlreadyExists);
    assert_eq!(e.server_code, "Conflict");
    assert_eq!(e.message, "");
    assert_eq!(
        DocumentDBError::classify(413, b"{}").code,
        DocumentDBErrorCode::TooLarge
    );
    for s in [400u16, 401, 403, 412, 429, 449, 500, 503] {
        assert_eq!(
            DocumentDBError::classify(s, b"{}").code,
            DocumentDBErrorCode::ServerError
        );
    }
    let e = DocumentDBError::classify(400, br#"{"code":"BadRequest","message":"bad"}"#);
    assert_eq!(
        e.to_string(),
        "code=ServerError status=400 server_code=\"BadRequest\" message=\"bad\""
    );
}
