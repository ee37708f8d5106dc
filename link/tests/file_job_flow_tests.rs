//! Upload → submit → poll → download against a fake backend.

mod common;

use common::{job_json, FakeBackend};
use pdfkit_link::{
    CompressionLevel, JobStatus, JobType, PdfLinkError, PollOutcome, SessionEvents,
    WatermarkPosition,
};

#[tokio::test]
async fn test_upload_download_round_trip() {
    let backend = FakeBackend::start().await;
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());

    let uploaded = client
        .files()
        .upload(b"%PDF-1.7 body".to_vec(), "report.pdf", "application/pdf", true)
        .await
        .unwrap();

    assert_eq!(uploaded.file_name, "report.pdf");
    assert_eq!(uploaded.content_type, "application/pdf");
    assert_eq!(uploaded.size_bytes, 13);
    assert_eq!(backend.with_state(|s| s.upload_queries.clone()), vec!["temporary=true"]);

    let bytes = client.files().download(&uploaded.file_id).await.unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.7 body");

    let meta = client.files().metadata(&uploaded.file_id).await.unwrap();
    assert_eq!(meta.size_bytes, 13);

    client.files().delete(&uploaded.file_id).await.unwrap();
    assert!(client.files().download(&uploaded.file_id).await.is_err());
}

#[tokio::test]
async fn test_upload_path_uses_file_name() {
    let backend = FakeBackend::start().await;
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());

    let dir = std::env::temp_dir().join(format!("pdfkit-link-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("scan.pdf");
    tokio::fs::write(&path, b"%PDF-scan").await.unwrap();

    let uploaded = client
        .files()
        .upload_path(&path, "application/pdf", false)
        .await
        .unwrap();

    assert_eq!(uploaded.file_name, "scan.pdf");
    assert_eq!(backend.with_state(|s| s.upload_queries.clone()), vec!["temporary=false"]);
    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_empty_upload_is_rejected_locally() {
    let backend = FakeBackend::start().await;
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());

    let result = client
        .files()
        .upload(Vec::new(), "empty.pdf", "application/pdf", true)
        .await;

    assert!(matches!(result, Err(PdfLinkError::ValidationError(_))));
    assert!(backend.with_state(|s| s.seen.is_empty()));
}

#[tokio::test]
async fn test_merge_with_one_file_never_submits() {
    let backend = FakeBackend::start().await;
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());

    let result = client.jobs().submit_merge(vec!["f1".into()], None).await;

    assert!(matches!(result, Err(PdfLinkError::ValidationError(_))));
    assert!(backend.with_state(|s| s.submits.is_empty()));
}

#[tokio::test]
async fn test_submit_bodies() {
    let backend = FakeBackend::start().await;
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());
    let jobs = client.jobs();

    let created = jobs
        .submit_merge(vec!["f1".into(), "f2".into()], Some("joined.pdf".into()))
        .await
        .unwrap();
    assert_eq!(created.job_id, "job-1");
    assert_eq!(created.status, JobStatus::Pending);

    jobs.submit_split("f1", "1-3, 5").await.unwrap();
    jobs.submit_compress("f1", CompressionLevel::High).await.unwrap();
    jobs.submit_watermark("f1", "DRAFT", WatermarkPosition::Diagonal)
        .await
        .unwrap();
    jobs.submit_protect("f1", "user-pw", None).await.unwrap();
    jobs.submit_unlock("f1", "user-pw").await.unwrap();
    jobs.submit_rotate("f1", 90, Some(vec![1, 2])).await.unwrap();

    let submits = backend.with_state(|s| s.submits.clone());
    let tools: Vec<&str> = submits.iter().map(|(tool, _)| tool.as_str()).collect();
    assert_eq!(
        tools,
        vec!["merge", "split", "compress", "watermark", "protect", "unlock", "rotate"]
    );

    assert_eq!(submits[0].1["fileIds"], serde_json::json!(["f1", "f2"]));
    assert_eq!(submits[0].1["outputFileName"], "joined.pdf");
    assert_eq!(submits[1].1["pageRanges"], "1-3,5");
    assert_eq!(submits[2].1["compressionLevel"], "HIGH");
    assert_eq!(submits[3].1["position"], "DIAGONAL");
    assert_eq!(submits[4].1["ownerPassword"], "user-pw");
    assert_eq!(submits[6].1["angle"], 90);
}

#[tokio::test]
async fn test_full_flow_polls_until_completed() {
    let backend = FakeBackend::start().await;
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());

    let input = client
        .files()
        .upload(b"%PDF-in".to_vec(), "in.pdf", "application/pdf", true)
        .await
        .unwrap();
    let output = client
        .files()
        .upload(b"%PDF-out".to_vec(), "out.pdf", "application/pdf", false)
        .await
        .unwrap();

    backend.with_state(|s| {
        s.job_script = vec![
            job_json("PROCESSING", None, None),
            job_json("PROCESSING", None, None),
            job_json("COMPLETED", Some(&output.file_id), None),
        ]
        .into();
    });

    let created = client
        .jobs()
        .submit_compress(&input.file_id, CompressionLevel::Medium)
        .await
        .unwrap();
    let outcome = client.jobs().poller(created.clone()).spawn().wait().await.unwrap();

    assert_eq!(outcome, PollOutcome::Succeeded(output.file_id.clone()));
    assert_eq!(backend.with_state(|s| s.job_fetches), 3);

    let result_id = outcome.into_result(&created.job_id).unwrap();
    let bytes = client.files().download(&result_id).await.unwrap();
    assert_eq!(&bytes[..], b"%PDF-out");
}

#[tokio::test]
async fn test_error_message_mid_poll_is_a_failure() {
    let backend = FakeBackend::start().await;
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());
    backend.with_state(|s| {
        s.job_script = vec![
            job_json("PROCESSING", None, Some("corrupt file")),
            job_json("FAILED", None, Some("corrupt file")),
        ]
        .into();
    });

    let created = client.jobs().submit_unlock("f1", "pw").await.unwrap();
    let result = client
        .jobs()
        .poller(created.clone())
        .spawn()
        .wait()
        .await
        .unwrap()
        .into_result(&created.job_id);

    match result {
        Err(PdfLinkError::JobFailed { message, .. }) => assert_eq!(message, "corrupt file"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(backend.with_state(|s| s.job_fetches), 1);
}

#[tokio::test]
async fn test_never_finishing_job_times_out() {
    let backend = FakeBackend::start().await;
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());
    backend.with_state(|s| s.job_script = vec![job_json("PROCESSING", None, None)].into());

    let created = client.jobs().submit_compress("f1", CompressionLevel::Low).await.unwrap();
    let max_attempts = client.timeouts().max_poll_attempts;
    let outcome = client.jobs().poller(created).spawn().wait().await.unwrap();

    assert_eq!(outcome, PollOutcome::TimedOut { attempts: max_attempts });
    assert_eq!(backend.with_state(|s| s.job_fetches), max_attempts);
}

#[tokio::test]
async fn test_list_jobs_decodes_backend_only_kinds() {
    let backend = FakeBackend::start().await;
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());

    let page = client.jobs().list_jobs(0, 20).await.unwrap();

    assert_eq!(page.total_elements, 2);
    assert_eq!(page.content[0].job_type, Some(JobType::Merge));
    assert_eq!(page.content[1].job_type, Some(JobType::Ocr));
    assert_eq!(page.content[1].status, JobStatus::Processing);
}
