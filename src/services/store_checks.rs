/*
 * Responsibility
 * - SnsService の性質テスト (どの store 実装でも成り立つべきもの)
 * - memory は sns.rs の tests、Postgres は pg_store.rs の tests から呼ぶ
 *
 * Checks never assume an empty store: they work only on posts they create,
 * so they can run side by side against a shared database.
 */
use crate::services::{Resource, SnsError, SnsService};

pub async fn assert_counts_match(svc: &SnsService, post_id: i64) {
    let post = svc.get_post(post_id).await.unwrap();
    let comments = svc.list_comments(post_id).await.unwrap();
    let likes = svc.list_likes(post_id).await.unwrap();
    assert_eq!(post.comment_count, comments.len() as i64);
    assert_eq!(post.like_count, likes.len() as i64);
}

pub async fn alice_and_bob_scenario(svc: &SnsService) {
    let post = svc.create_post("alice", "hello").await.unwrap();
    assert_eq!(post.like_count, 0);
    assert_eq!(post.comment_count, 0);

    let comment = svc.create_comment(post.post_id, "bob", "hi").await.unwrap();
    assert_eq!(svc.get_post(post.post_id).await.unwrap().comment_count, 1);

    svc.like_post(post.post_id, "bob").await.unwrap();
    assert_eq!(svc.get_post(post.post_id).await.unwrap().like_count, 1);

    assert!(matches!(
        svc.like_post(post.post_id, "bob").await,
        Err(SnsError::Conflict)
    ));
    assert_eq!(svc.get_post(post.post_id).await.unwrap().like_count, 1);
    assert_eq!(svc.list_likes(post.post_id).await.unwrap().len(), 1);

    svc.delete_comment(post.post_id, comment.comment_id)
        .await
        .unwrap();
    assert_eq!(svc.get_post(post.post_id).await.unwrap().comment_count, 0);

    svc.delete_post(post.post_id).await.unwrap();
    assert!(matches!(
        svc.get_post(post.post_id).await,
        Err(SnsError::NotFound(Resource::Post))
    ));
    assert!(matches!(
        svc.list_comments(post.post_id).await,
        Err(SnsError::NotFound(Resource::Post))
    ));
    assert!(matches!(
        svc.list_likes(post.post_id).await,
        Err(SnsError::NotFound(Resource::Post))
    ));
}

pub async fn comment_validation_edges(svc: &SnsService) {
    let post = svc.create_post("alice", "hello").await.unwrap();
    let id = post.post_id;
    let comment = svc.create_comment(id, "bob", "hi").await.unwrap();

    assert!(matches!(
        svc.create_comment(id, "", "hi").await,
        Err(SnsError::InvalidInput("userName is required"))
    ));
    assert!(matches!(
        svc.create_comment(id, "bob", " ").await,
        Err(SnsError::InvalidInput("content is required"))
    ));
    assert!(matches!(
        svc.update_comment(id, comment.comment_id, "").await,
        Err(SnsError::InvalidInput("content cannot be empty"))
    ));
    assert_eq!(
        svc.get_comment(id, comment.comment_id).await.unwrap().content,
        "hi"
    );

    // live post, comment id that was never issued for it
    assert!(matches!(
        svc.update_comment(id, -1, "edited").await,
        Err(SnsError::NotFound(Resource::Comment))
    ));
    assert!(matches!(
        svc.delete_comment(id, -1).await,
        Err(SnsError::NotFound(Resource::Comment))
    ));

    assert_eq!(svc.get_post(id).await.unwrap().comment_count, 1);
    assert_counts_match(svc, id).await;
}

pub async fn unlike_twice_reports_missing_like(svc: &SnsService) {
    let post = svc.create_post("alice", "hello").await.unwrap();
    svc.like_post(post.post_id, "bob").await.unwrap();

    svc.unlike_post(post.post_id, "bob").await.unwrap();
    assert!(matches!(
        svc.unlike_post(post.post_id, "bob").await,
        Err(SnsError::NotFound(Resource::Like))
    ));
    assert_eq!(svc.get_post(post.post_id).await.unwrap().like_count, 0);
    assert!(!svc.has_liked(post.post_id, "bob").await.unwrap());

    assert!(matches!(
        svc.unlike_post(-1, "bob").await,
        Err(SnsError::NotFound(Resource::Post))
    ));
}

pub async fn counters_track_mixed_sequences(svc: &SnsService) {
    let post = svc.create_post("alice", "hello").await.unwrap();
    let id = post.post_id;

    let mut comment_ids = Vec::new();
    for i in 0..5 {
        let c = svc
            .create_comment(id, "bob", &format!("c{i}"))
            .await
            .unwrap();
        comment_ids.push(c.comment_id);
    }
    for user in ["u1", "u2", "u3", "u4"] {
        svc.like_post(id, user).await.unwrap();
    }
    svc.delete_comment(id, comment_ids[1]).await.unwrap();
    svc.delete_comment(id, comment_ids[3]).await.unwrap();
    svc.unlike_post(id, "u2").await.unwrap();
    let _ = svc.like_post(id, "u1").await;
    let _ = svc.unlike_post(id, "nobody").await;

    let post = svc.get_post(id).await.unwrap();
    assert_eq!(post.comment_count, 3);
    assert_eq!(post.like_count, 3);
    assert_counts_match(svc, id).await;

    let recounted = svc.reconcile_counts(id).await.unwrap();
    assert_eq!(recounted.comment_count, 3);
    assert_eq!(recounted.like_count, 3);
}

pub async fn delete_post_cascades_only_its_own_children(svc: &SnsService) {
    let doomed = svc.create_post("alice", "bye").await.unwrap();
    let kept = svc.create_post("alice", "stay").await.unwrap();

    let c = svc.create_comment(doomed.post_id, "bob", "x").await.unwrap();
    svc.like_post(doomed.post_id, "bob").await.unwrap();
    svc.create_comment(kept.post_id, "bob", "y").await.unwrap();
    svc.like_post(kept.post_id, "bob").await.unwrap();

    svc.delete_post(doomed.post_id).await.unwrap();

    assert!(matches!(
        svc.get_comment(doomed.post_id, c.comment_id).await,
        Err(SnsError::NotFound(_))
    ));
    assert!(matches!(
        svc.like_post(doomed.post_id, "carol").await,
        Err(SnsError::NotFound(Resource::Post))
    ));
    assert!(matches!(
        svc.delete_post(doomed.post_id).await,
        Err(SnsError::NotFound(Resource::Post))
    ));

    let posts = svc.list_posts().await.unwrap();
    assert!(posts.iter().all(|p| p.post_id != doomed.post_id));
    let kept = posts
        .iter()
        .find(|p| p.post_id == kept.post_id)
        .unwrap();
    assert_eq!(kept.comment_count, 1);
    assert_eq!(kept.like_count, 1);
    assert_counts_match(svc, kept.post_id).await;
}

pub async fn concurrent_likes_by_same_user_admit_exactly_one(svc: &SnsService) {
    let post = svc.create_post("alice", "hello").await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..32 {
        let svc = svc.clone();
        let id = post.post_id;
        handles.push(tokio::spawn(
            async move { svc.like_post(id, "bob").await },
        ));
    }

    let mut ok = 0;
    let mut conflicts = 0;
    for h in handles {
        match h.await.unwrap() {
            Ok(_) => ok += 1,
            Err(SnsError::Conflict) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(conflicts, 31);
    assert_eq!(svc.get_post(post.post_id).await.unwrap().like_count, 1);
    assert_eq!(svc.list_likes(post.post_id).await.unwrap().len(), 1);
}

pub async fn concurrent_comment_churn_keeps_count_exact(svc: &SnsService) {
    let post = svc.create_post("alice", "hello").await.unwrap();
    let id = post.post_id;

    let mut handles = Vec::new();
    for i in 0..16 {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move {
            let c = svc
                .create_comment(id, "bob", &format!("c{i}"))
                .await
                .unwrap();
            if i % 2 == 0 {
                svc.delete_comment(id, c.comment_id).await.unwrap();
            }
            svc.like_post(id, &format!("user{i}")).await.unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let post = svc.get_post(id).await.unwrap();
    assert_eq!(post.comment_count, 8);
    assert_eq!(post.like_count, 16);
    assert_counts_match(svc, id).await;
}

pub async fn children_racing_a_cascade_leave_no_orphans(svc: &SnsService) {
    let post = svc.create_post("alice", "hello").await.unwrap();
    let id = post.post_id;

    let mut handles = Vec::new();
    for i in 0..16 {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move {
            let _ = svc.create_comment(id, "bob", &format!("c{i}")).await;
            let _ = svc.like_post(id, &format!("user{i}")).await;
        }));
    }
    let deleter = {
        let svc = svc.clone();
        tokio::spawn(async move { svc.delete_post(id).await })
    };
    for h in handles {
        h.await.unwrap();
    }
    deleter.await.unwrap().unwrap();

    assert!(svc.list_posts().await.unwrap().iter().all(|p| p.post_id != id));
    assert!(matches!(
        svc.list_comments(id).await,
        Err(SnsError::NotFound(Resource::Post))
    ));
    assert!(matches!(
        svc.list_likes(id).await,
        Err(SnsError::NotFound(Resource::Post))
    ));
}
