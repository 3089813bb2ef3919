//! HTTP contract of the Elasticsearch store, against a mock server.

use chrono::NaiveDate;
use dossier_core::{DocumentRecord, Error, ExactFilters, ExtractionMethod, RecordStatus};
use dossier_query::{compile, compile_with_filters};
use dossier_store::{DocumentStore, ElasticConfig, ElasticStore};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(id: &str) -> DocumentRecord {
    let ts = NaiveDate::from_ymd_opt(2024, 3, 14)
        .unwrap()
        .and_hms_opt(9, 26, 53)
        .unwrap();
    DocumentRecord {
        id: id.into(),
        name: "bail_commercial.pdf".into(),
        path: "/srv/cabinet/contrats/bail_commercial.pdf".into(),
        directory: "/srv/cabinet/contrats".into(),
        extension: ".pdf".into(),
        size_bytes: 48213,
        modified_at: ts,
        indexed_at: ts,
        mime_type: "application/pdf".into(),
        keywords: ["bail".to_string(), "commercial".to_string()]
            .into_iter()
            .collect(),
        category: "Contrats".into(),
        specialty: "Droit commercial".into(),
        person: "Maître Martin".into(),
        status: RecordStatus::Indexed,
        content: "Bail commercial entre les parties.".into(),
        method: ExtractionMethod::NativeText,
    }
}

async fn store(server: &MockServer) -> ElasticStore {
    ElasticStore::new(ElasticConfig::new(server.uri())).unwrap()
}

#[tokio::test]
async fn put_sends_record_to_doc_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/documents_cabinet/_doc/ab12cd34"))
        .and(body_partial_json(json!({
            "id": "ab12cd34",
            "nom": "bail_commercial.pdf",
            "avocat": "Maître Martin",
            "statut": "indexé",
            "type_fichier": "texte"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"result": "created"})))
        .expect(1)
        .mount(&server)
        .await;

    store(&server).await.put(&record("ab12cd34")).await.unwrap();
}

#[tokio::test]
async fn put_blanks_sentinel_content() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/documents_cabinet/_doc/sc4nn3d0"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"result": "created"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut scanned = record("sc4nn3d0");
    scanned.content = "[PDF reader unavailable]".into();
    scanned.method = ExtractionMethod::Standard;
    store(&server).await.put(&scanned).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["contenu_textuel"], "");
    assert_eq!(body["nom"], "bail_commercial.pdf");
}

#[tokio::test]
async fn delete_tolerates_missing_document() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/documents_cabinet/_doc/gone0000"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"result": "not_found"})))
        .expect(1)
        .mount(&server)
        .await;

    store(&server).await.delete("gone0000").await.unwrap();
}

#[tokio::test]
async fn search_sends_filters_and_parses_hits() {
    let server = MockServer::start().await;
    let source = serde_json::to_value(record("ab12cd34")).unwrap();
    Mock::given(method("POST"))
        .and(path("/documents_cabinet/_search"))
        .and(body_partial_json(json!({
            "size": 100,
            "query": {"bool": {"filter": [{"term": {"specialite": "Droit commercial"}}]}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": {
                "total": {"value": 1},
                "hits": [{
                    "_id": "ab12cd34",
                    "_score": 7.25,
                    "_source": source,
                    "highlight": {"contenu_textuel": ["<mark>Bail</mark> commercial"]}
                }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = ExactFilters::new(Some("Droit commercial".into()), None, None);
    let hits = store(&server)
        .await
        .search(&compile_with_filters("bail", filters))
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].score, 7.25);
    assert_eq!(hits[0].record, record("ab12cd34"));
    let highlight = hits[0].highlight.as_ref().unwrap();
    assert_eq!(highlight["contenu_textuel"], vec!["<mark>Bail</mark> commercial"]);
}

#[tokio::test]
async fn search_error_status_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents_cabinet/_search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("cluster unavailable"))
        .mount(&server)
        .await;

    let err = store(&server)
        .await
        .search(&compile("bail"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Search(ref msg) if msg.contains("503")));
}

#[tokio::test]
async fn ping_reports_reachability() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tagline": "You Know, for Search"})))
        .mount(&server)
        .await;
    assert!(store(&server).await.ping().await);

    let unreachable = ElasticStore::new(ElasticConfig {
        timeout_secs: 1,
        ..ElasticConfig::new("http://127.0.0.1:9")
    })
    .unwrap();
    assert!(!unreachable.ping().await);
}
