use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread::JoinHandle;

use navimpact_client::{
    ApiConfig, ApiError, ExportFormat, GrantApi, GrantDraft, GrantQuery, HttpGrantApi,
    ImpactReportRequest, RecommendationRequest, SmartSearchRequest,
};
use navimpact_core::{ImpactMetrics, ProjectProfile};

#[derive(Debug)]
struct Captured {
    request_line: String,
    authorization: Option<String>,
    body: String,
}

struct Canned {
    status: u16,
    body: &'static str,
}

struct Stub {
    base_url: String,
    requests: mpsc::Receiver<Captured>,
    handle: JoinHandle<()>,
}

fn spawn_stub(responses: Vec<Canned>) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    let (tx, rx) = mpsc::channel();

    let handle = std::thread::spawn(move || {
        for canned in responses {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("request line");
            let mut content_length = 0_usize;
            let mut authorization = None;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("header line");
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    let name = name.trim().to_ascii_lowercase();
                    if name == "content-length" {
                        content_length = value.trim().parse().unwrap_or(0);
                    } else if name == "authorization" {
                        authorization = Some(value.trim().to_string());
                    }
                }
            }
            let mut body = vec![0_u8; content_length];
            reader.read_exact(&mut body).expect("request body");

            tx.send(Captured {
                request_line: request_line.trim_end().to_string(),
                authorization,
                body: String::from_utf8_lossy(&body).into_owned(),
            })
            .expect("send captured");

            let reason = if canned.status < 400 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                canned.status,
                canned.body.len(),
                canned.body
            );
            stream.write_all(response.as_bytes()).expect("write response");
            stream.flush().expect("flush");
        }
    });

    Stub {
        base_url: format!("http://{addr}"),
        requests: rx,
        handle,
    }
}

#[tokio::test]
async fn grant_crud_round_trip() {
    let stub = spawn_stub(vec![
        Canned {
            status: 200,
            body: r#"{"grants":[{"id":"g-1","title":"Screen Fund","funder":"VicScreen"}],"total":31}"#,
        },
        Canned {
            status: 201,
            body: r#"{"id":"g-2","title":"Arts Boost","status":"draft"}"#,
        },
        Canned {
            status: 204,
            body: "",
        },
    ]);
    let api = HttpGrantApi::new(ApiConfig::new(&stub.base_url).with_api_key("secret"))
        .expect("build api");

    let query = GrantQuery {
        category: Some("film".to_string()),
        ..GrantQuery::default()
    };
    let page = api.list_grants(&query).await.expect("list grants");
    assert_eq!(page.total, 31);
    assert_eq!(page.grants[0].funder, "VicScreen");

    let draft = GrantDraft {
        title: "Arts Boost".to_string(),
        ..GrantDraft::default()
    };
    let created = api.create_grant(&draft).await.expect("create grant");
    assert_eq!(created.id, "g-2");
    assert_eq!(created.status, "draft");

    api.delete_grant("g-2").await.expect("delete grant");

    let list = stub.requests.recv().expect("list request");
    assert_eq!(list.request_line, "GET /api/grants?category=film HTTP/1.1");
    assert_eq!(list.authorization.as_deref(), Some("Bearer secret"));

    let create = stub.requests.recv().expect("create request");
    assert_eq!(create.request_line, "POST /api/grants HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&create.body).expect("create body");
    assert_eq!(sent["title"], "Arts Boost");

    let delete = stub.requests.recv().expect("delete request");
    assert_eq!(delete.request_line, "DELETE /api/grants/g-2 HTTP/1.1");

    stub.handle.join().expect("stub thread");
}

#[tokio::test]
async fn error_status_is_surfaced_with_body() {
    let stub = spawn_stub(vec![Canned {
        status: 404,
        body: r#"{"detail":"not found"}"#,
    }]);
    let api = HttpGrantApi::new(ApiConfig::new(&stub.base_url)).expect("build api");

    let err = api.get_grant("missing").await.err().expect("error");
    assert!(err.is_not_found());
    match err {
        ApiError::Api { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("not found"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let captured = stub.requests.recv().expect("request");
    assert!(captured.authorization.is_none());
    stub.handle.join().expect("stub thread");
}

#[tokio::test]
async fn search_export_and_report_endpoints() {
    let stub = spawn_stub(vec![
        Canned {
            status: 200,
            body: r#"{"results":[{"id":"g-9","title":"Green Jobs"}]}"#,
        },
        Canned {
            status: 200,
            body: "\"ID\",\"Title\"\n\"g-9\",\"Green Jobs\"",
        },
        Canned {
            status: 202,
            body: r#"{"reportId":"rep-1","status":"queued"}"#,
        },
    ]);
    let api = HttpGrantApi::new(ApiConfig::new(&stub.base_url)).expect("build api");

    let found = api
        .smart_search(&SmartSearchRequest {
            query: "clean energy".to_string(),
            limit: Some(5),
        })
        .await
        .expect("smart search");
    assert_eq!(found.len(), 1);

    let csv = api
        .export_grants(ExportFormat::Csv, &GrantQuery::default())
        .await
        .expect("export");
    assert!(String::from_utf8_lossy(&csv).starts_with("\"ID\""));

    let receipt = api
        .impact_report(&ImpactReportRequest {
            project_id: "proj-1".to_string(),
            metrics: ImpactMetrics::default(),
            profile: ProjectProfile::new("film"),
        })
        .await
        .expect("impact report");
    assert_eq!(receipt.report_id, "rep-1");
    assert_eq!(receipt.status, "queued");

    let search = stub.requests.recv().expect("search request");
    assert_eq!(search.request_line, "POST /api/grants/search/smart HTTP/1.1");
    assert!(search.body.contains("\"clean energy\""));
    let export = stub.requests.recv().expect("export request");
    assert_eq!(export.request_line, "GET /api/grants/export?format=csv HTTP/1.1");
    let report = stub.requests.recv().expect("report request");
    assert_eq!(report.request_line, "POST /api/impact/reports HTTP/1.1");

    stub.handle.join().expect("stub thread");
}

#[tokio::test]
async fn fetch_update_and_insight_endpoints() {
    let stub = spawn_stub(vec![
        Canned {
            status: 200,
            body: r#"{"id":"g-3","title":"Fetched","fundingBody":"Creative Victoria","amount":25000}"#,
        },
        Canned {
            status: 200,
            body: r#"{"id":"g-3","title":"Updated","status":"closed"}"#,
        },
        Canned {
            status: 200,
            body: r#"{"totalGrants":3,"totalFunding":75000.5,"byCategory":{"film":2,"arts":1},"pipeline":"healthy"}"#,
        },
        Canned {
            status: 200,
            body: r#"{"data":[{"grant":{"id":"g-7","title":"Green Jobs"},"matchScore":88.5,"reasons":["sector match"]}]}"#,
        },
        Canned {
            status: 200,
            body: r#"[{"grant":{"id":"g-8","title":"Arts Boost"},"match_score":61.0}]"#,
        },
    ]);
    let api = HttpGrantApi::new(ApiConfig::new(&stub.base_url)).expect("build api");

    let fetched = api.get_grant("g-3").await.expect("get grant");
    assert_eq!(fetched.title, "Fetched");
    assert_eq!(fetched.funder, "Creative Victoria");
    assert_eq!(fetched.amount, Some(25000.0));

    let draft = GrantDraft {
        title: "Updated".to_string(),
        status: Some("closed".to_string()),
        ..GrantDraft::default()
    };
    let updated = api.update_grant("g-3", &draft).await.expect("update grant");
    assert_eq!(updated.title, "Updated");
    assert_eq!(updated.status, "closed");

    let analytics = api.analytics().await.expect("analytics");
    assert_eq!(analytics.total_grants, 3);
    assert!((analytics.total_funding - 75000.5).abs() < f64::EPSILON);
    assert_eq!(analytics.by_category.get("film"), Some(&2));
    assert_eq!(
        analytics.extra.get("pipeline").and_then(|v| v.as_str()),
        Some("healthy")
    );

    let request = RecommendationRequest {
        profile: ProjectProfile::new("clean energy jobs"),
        limit: Some(3),
    };
    let wrapped = api.recommendations(&request).await.expect("wrapped recommendations");
    assert_eq!(wrapped.len(), 1);
    assert_eq!(wrapped[0].grant.id, "g-7");
    assert!((wrapped[0].match_score - 88.5).abs() < f64::EPSILON);
    assert_eq!(wrapped[0].reasons, vec!["sector match"]);

    let bare = api.recommendations(&request).await.expect("bare recommendations");
    assert_eq!(bare.len(), 1);
    assert_eq!(bare[0].grant.title, "Arts Boost");

    let get = stub.requests.recv().expect("get request");
    assert_eq!(get.request_line, "GET /api/grants/g-3 HTTP/1.1");
    let update = stub.requests.recv().expect("update request");
    assert_eq!(update.request_line, "PUT /api/grants/g-3 HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&update.body).expect("update body");
    assert_eq!(sent["status"], "closed");
    let analytics = stub.requests.recv().expect("analytics request");
    assert_eq!(analytics.request_line, "GET /api/grants/analytics HTTP/1.1");
    for _ in 0..2 {
        let recs = stub.requests.recv().expect("recommendations request");
        assert_eq!(recs.request_line, "POST /api/grants/ai/recommendations HTTP/1.1");
        assert!(recs.body.contains("\"limit\":3"));
    }

    stub.handle.join().expect("stub thread");
}

#[tokio::test]
async fn blank_inputs_fail_before_any_request() {
    let api = HttpGrantApi::new(ApiConfig::new("http://127.0.0.1:9")).expect("build api");
    assert!(matches!(api.get_grant("  ").await, Err(ApiError::Config(_))));
    assert!(matches!(
        api.smart_search(&SmartSearchRequest {
            query: String::new(),
            limit: None,
        })
        .await,
        Err(ApiError::Config(_))
    ));
}
