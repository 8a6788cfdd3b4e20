//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::mock_transport::{throttled, MockTransport};
use crate::transport::HttpResponse;
use crate::types::{Collection, Document};
use crate::{DocumentDBErrorCode, QueryRequest, DEFAULT_MAX_ATTEMPTS};
use std::error::Error;
use std::result::Result;

fn collection() -> Collection {
    crate::resource::decode_resource(br#"{"id":"items","_rid":"AbC=Xy1=","_self":"dbs/AbC=/colls/AbC=Xy1=/"}"#)
        .unwrap()
}

fn page(ids: &[&str]) -> String {
    let docs: Vec<String> = ids
        .iter()
        .map(|id| format!(r#"{{"id":"{}","_rid":"r-{}"}}"#, id, id))
        .collect();
    format!(
        r#"{{"_rid":"AbC=Xy1=","Documents":[{}],"_count":{}}}"#,
        docs.join(","),
        ids.len()
    )
}

fn page_with_token(ids: &[&str], token: &str) -> HttpResponse {
    HttpResponse::new(200, page(ids)).with_header("x-ms-continuation", token)
}

#[tokio::test]
async fn test_single_page_exhaustion() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new().respond(HttpResponse::new(200, page(&["a", "b", "c"])));
    let handle = mock.handle()?;
    let mut iter = QueryRequest::<Document>::new(&collection(), "SELECT * FROM c")
        .execute(&handle)
        .await?;
    let mut ids = Vec::new();
    while iter.has_more().await? {
        ids.push(iter.next()?.id().to_string());
    }
    assert_eq!(ids, vec!["a", "b", "c"]);
    // exhausted stays exhausted, without further requests
    assert!(!iter.has_more().await?);
    assert!(!iter.has_more().await?);
    assert_eq!(mock.send_count(), 1);
    assert_eq!(iter.pages_fetched(), 1);
    assert_eq!(iter.continuation_token(), "");
    Ok(())
}

#[tokio::test]
async fn test_continuation_pages() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new()
        .respond(page_with_token(&["A", "B"], "T1"))
        .respond(HttpResponse::new(200, page(&["C"])));
    let handle = mock.handle()?;
    let mut iter = QueryRequest::<Document>::new(&collection(), "SELECT * FROM c")
        .page_size(2)?
        .execute(&handle)
        .await?;
    assert_eq!(iter.continuation_token(), "T1");

    assert!(iter.has_more().await?);
    assert_eq!(iter.next()?.id(), "A");
    assert!(iter.has_more().await?);
    assert_eq!(iter.next()?.id(), "B");
    assert_eq!(mock.send_count(), 1);
    assert!(iter.has_more().await?);
    assert_eq!(mock.send_count(), 2);
    assert_eq!(iter.next()?.id(), "C");
    assert!(!iter.has_more().await?);
    assert_eq!(mock.send_count(), 2);

    let sent = mock.sent();
    assert_eq!(sent[0].header("x-ms-continuation"), None);
    assert_eq!(sent[1].header("x-ms-continuation"), Some("T1"));
    for req in &sent {
        assert_eq!(req.method, reqwest::Method::POST);
        assert_eq!(
            req.url.as_str(),
            "https://acct.documents.azure.com/dbs/AbC=/colls/AbC=Xy1=/docs"
        );
        assert_eq!(req.header("content-type"), Some("application/sql"));
        assert_eq!(req.header("x-ms-documentdb-isquery"), Some("true"));
        assert_eq!(req.header("x-ms-max-item-count"), Some("2"));
        assert_eq!(req.header("x-ms-version"), Some("2017-02-22"));
        assert!(req.header("x-ms-date").is_some());
        assert!(req
            .header("authorization")
            .unwrap()
            .starts_with("type=master&ver=1.0&sig="));
        assert_eq!(req.body.as_ref(), b"SELECT * FROM c");
    }
    Ok(())
}

#[tokio::test]
async fn test_empty_page_with_token_is_skipped() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new()
        .respond(page_with_token(&[], "T1"))
        .respond(page_with_token(&[], "T2"))
        .respond(HttpResponse::new(200, page(&["z"])));
    let handle = mock.handle()?;
    let mut iter = QueryRequest::<Document>::new(&collection(), "SELECT * FROM c")
        .execute(&handle)
        .await?;
    assert_eq!(mock.send_count(), 1);
    assert!(iter.has_more().await?);
    assert_eq!(mock.send_count(), 3);
    assert_eq!(iter.next()?.id(), "z");
    assert!(!iter.has_more().await?);
    assert_eq!(iter.pages_fetched(), 3);
    assert_eq!(mock.sent()[2].header("x-ms-continuation"), Some("T2"));
    // default page size lets the service decide
    assert_eq!(mock.sent()[0].header("x-ms-max-item-count"), Some("-1"));
    Ok(())
}

#[tokio::test]
async fn test_empty_result() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new().respond(HttpResponse::new(200, page(&[])));
    let handle = mock.handle()?;
    let mut iter = QueryRequest::<Document>::new(&collection(), "SELECT * FROM c WHERE false")
        .execute(&handle)
        .await?;
    assert!(!iter.has_more().await?);
    assert!(iter.collect_all().await?.is_empty());
    assert_eq!(mock.send_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_next_misuse() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new().respond(HttpResponse::new(200, page(&["a", "b"])));
    let handle = mock.handle()?;
    let mut iter = QueryRequest::<Document>::new(&collection(), "SELECT * FROM c")
        .execute(&handle)
        .await?;

    // next() before has_more()
    let err = iter.next().unwrap_err();
    assert_eq!(err.code, DocumentDBErrorCode::IteratorMisuse);

    assert!(iter.has_more().await?);
    assert_eq!(iter.next()?.id(), "a");
    // a second next() needs a second has_more()
    let err = iter.next().unwrap_err();
    assert_eq!(err.code, DocumentDBErrorCode::IteratorMisuse);

    assert!(iter.has_more().await?);
    assert_eq!(iter.next()?.id(), "b");
    assert!(!iter.has_more().await?);
    let err = iter.next().unwrap_err();
    assert_eq!(err.code, DocumentDBErrorCode::IteratorMisuse);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_page_fetch_errors() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new()
        .respond(page_with_token(&["a"], "T1"))
        .respond(throttled(10))
        .respond(HttpResponse::new(
            400,
            r#"{"code":"BadRequest","message":"continuation expired"}"#,
        ));
    let handle = mock.handle()?;
    let mut iter = QueryRequest::<Document>::new(&collection(), "SELECT * FROM c")
        .execute(&handle)
        .await?;
    assert!(iter.has_more().await?);
    iter.next()?;
    // query pages are retried on 429, then the 400 surfaces
    let err = iter.has_more().await.unwrap_err();
    assert_eq!(err.code, DocumentDBErrorCode::ServerError);
    assert_eq!(err.server_code, "BadRequest");
    assert_eq!(mock.send_count(), 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_continuation_page_throttled_to_ceiling() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new()
        .respond(page_with_token(&["a"], "T1"))
        .respond_always(throttled(5));
    let handle = mock.handle()?;
    let mut iter = QueryRequest::<Document>::new(&collection(), "SELECT * FROM c")
        .execute(&handle)
        .await?;
    assert!(iter.has_more().await?);
    assert_eq!(iter.next()?.id(), "a");
    assert_eq!(mock.send_count(), 1);

    let err = iter.has_more().await.unwrap_err();
    assert_eq!(err.code, DocumentDBErrorCode::ServerError);
    assert_eq!(err.status, Some(429));
    assert_eq!(mock.send_count(), 1 + DEFAULT_MAX_ATTEMPTS as usize);
    // every resend asks for the same page
    for req in &mock.sent()[1..] {
        assert_eq!(req.header("x-ms-continuation"), Some("T1"));
    }
    // the token is kept, so the caller may try again later
    assert_eq!(iter.continuation_token(), "T1");
    Ok(())
}

#[tokio::test]
async fn test_bad_query_response() -> Result<(), Box<dyn Error>> {
    let mock = MockTransport::new().respond(HttpResponse::new(200, r#"{"Users":[]}"#));
    let handle = mock.handle()?;
    let err = QueryRequest::<Document>::new(&collection(), "SELECT * FROM c")
        .execute(&handle)
        .await
        .unwrap_err();
    assert_eq!(err.code, DocumentDBErrorCode::BadResponse);
    Ok(())
}

#[test]
fn test_page_size_limits() {
    let coll = collection();
    assert!(QueryRequest::<Document>::new(&coll, "q").page_size(0).is_err());
    assert!(QueryRequest::<Document>::new(&coll, "q").page_size(-2).is_err());
    assert!(QueryRequest::<Document>::new(&coll, "q").page_size(-1).is_ok());
    assert!(QueryRequest::<Document>::new(&coll, "q").page_size(100).is_ok());
}
