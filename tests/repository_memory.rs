use std::sync::Arc;

use microlink::domain::entities::{AddOutcome, BatchRecord, DeleteIntent, Record};
use microlink::domain::repositories::{DeleteRepository, LinkRepository};
use microlink::infrastructure::persistence::MemoryRepository;

#[tokio::test]
async fn test_add_is_idempotent_per_url() {
    let repo = MemoryRepository::new();

    let first = repo
        .add("firstIdA", &Record::new("user-1", "https://example.com"))
        .await
        .unwrap();
    let second = repo
        .add("secondId", &Record::new("user-1", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(first.outcome, AddOutcome::Created);
    assert_eq!(second.outcome, AddOutcome::AlreadyExists);
    assert_eq!(first.short_id, second.short_id);
}

#[tokio::test]
async fn test_concurrent_adds_converge_on_one_id() {
    let repo = Arc::new(MemoryRepository::new());

    let mut handles = Vec::new();
    for i in 0..16 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.add(
                &format!("cand{:04}", i),
                &Record::new(format!("user-{i}"), "https://example.com"),
            )
            .await
            .unwrap()
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    let winner = &results[0].short_id;
    assert!(results.iter().all(|r| &r.short_id == winner));

    let created = results
        .iter()
        .filter(|r| r.outcome == AddOutcome::Created)
        .count();
    assert_eq!(created, 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| r.outcome == AddOutcome::AlreadyExists)
            .count(),
        15
    );
}

#[tokio::test]
async fn test_get_distinguishes_never_issued_from_deleted() {
    let repo = MemoryRepository::new();
    repo.add("AbCdEfGh", &Record::new("user-1", "https://example.com"))
        .await
        .unwrap();

    assert!(repo.get("NeVeRmAd").await.unwrap().is_none());

    repo.soft_delete(&[DeleteIntent::new("user-1", "AbCdEfGh")])
        .await
        .unwrap();

    let link = repo.get("AbCdEfGh").await.unwrap().unwrap();
    assert!(link.deleted);
    assert_eq!(link.url, "https://example.com");
}

#[tokio::test]
async fn test_batch_partial_reuse() {
    let repo = MemoryRepository::new();
    let existing = repo
        .add("ExIsTiNg", &Record::new("user-0", "https://example.com/2"))
        .await
        .unwrap();

    let results = repo
        .add_batch(
            "user-1",
            vec![
                BatchRecord {
                    corr_id: "u1".to_string(),
                    short_id: "candAaAa".to_string(),
                    url: "https://example.com/1".to_string(),
                },
                BatchRecord {
                    corr_id: "u2".to_string(),
                    short_id: "candBbBb".to_string(),
                    url: "https://example.com/2".to_string(),
                },
                BatchRecord {
                    corr_id: "u3".to_string(),
                    short_id: "candCcCc".to_string(),
                    url: "https://example.com/3".to_string(),
                },
            ],
        )
        .await
        .unwrap();

    assert_eq!(results[0].outcome, AddOutcome::Created);
    assert_eq!(results[0].short_id, "candAaAa");
    assert_eq!(results[1].outcome, AddOutcome::AlreadyExists);
    assert_eq!(results[1].short_id, existing.short_id);
    assert_eq!(results[2].outcome, AddOutcome::Created);
    assert_eq!(results[2].short_id, "candCcCc");
}

#[tokio::test]
async fn test_batch_appends_created_records_to_user_list() {
    let repo = MemoryRepository::new();

    repo.add_batch(
        "user-1",
        vec![
            BatchRecord {
                corr_id: "a".to_string(),
                short_id: "candAaAa".to_string(),
                url: "https://example.com/1".to_string(),
            },
            BatchRecord {
                corr_id: "b".to_string(),
                short_id: "candBbBb".to_string(),
                url: "https://example.com/2".to_string(),
            },
        ],
    )
    .await
    .unwrap();

    let urls = repo.user_urls("user-1").await.unwrap();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls[0].short_id, "candAaAa");
    assert_eq!(urls[1].short_id, "candBbBb");
}

#[tokio::test]
async fn test_user_list_keeps_deleted_entries() {
    let repo = MemoryRepository::new();
    repo.add("AbCdEfGh", &Record::new("user-1", "https://example.com"))
        .await
        .unwrap();
    repo.soft_delete(&[DeleteIntent::new("user-1", "AbCdEfGh")])
        .await
        .unwrap();

    // Append-only: the listing is history, not live state.
    let urls = repo.user_urls("user-1").await.unwrap();
    assert_eq!(urls.len(), 1);
}

#[tokio::test]
async fn test_soft_delete_unknown_id_is_silent() {
    let repo = MemoryRepository::new();
    repo.soft_delete(&[DeleteIntent::new("user-1", "NeVeRmAd")])
        .await
        .unwrap();
}
