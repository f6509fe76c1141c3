//! End-to-end board flows: mocked transport under the real services, with
//! every confirmed mutation reconciled through the tree updater.

#[path = "fixtures.rs"]
mod fixtures;

use std::sync::Arc;

use fake::faker::lorem::en::Sentence;
use fake::Fake;

use domains::models::{CommentId, ParentRef, PostId, ReactionId, SessionUser, Token};
use domains::reactions::ReactionKind;
use domains::tree;
use domains::{
    AppError, MockAccountApi, MockBoardApi, MockSessionStore, MockTelemetrySink,
    MockTokenDecoder,
};
use services::{BoardService, SessionService};
use views::NodeUiState;

fn quiet_telemetry() -> Arc<MockTelemetrySink> {
    let mut telemetry = MockTelemetrySink::new();
    telemetry.expect_record().return_const(());
    Arc::new(telemetry)
}

async fn session_for(user: Option<&str>) -> Arc<SessionService> {
    let mut store = MockSessionStore::new();
    let mut decoder = MockTokenDecoder::new();
    match user {
        Some(name) => {
            store
                .expect_load_token()
                .returning(|| Ok(Some(Token::new("h.p.s"))));
            let name = name.to_string();
            decoder.expect_decode().returning(move |_| {
                Some(SessionUser {
                    username: name.clone(),
                    is_admin: false,
                })
            });
        }
        None => {
            store.expect_load_token().returning(|| Ok(None));
        }
    }
    let session = Arc::new(SessionService::new(
        Arc::new(MockAccountApi::new()),
        Arc::new(decoder),
        Arc::new(store),
    ));
    session.restore().await.expect("restore never fails here");
    session
}

/// Adding a laugh to a post that already has two, then deleting it again,
/// leaves the counts exactly where they started and the "mine" entry gone.
#[tokio::test]
async fn reaction_add_then_delete_round_trips_counts() {
    let snapshot = fixtures::snapshot(
        vec![fixtures::post("p1", fixtures::laugh_counts(2), vec![])],
        vec![],
    );

    let mut api = MockBoardApi::new();
    let served = snapshot.clone();
    api.expect_fetch_board()
        .returning(move |_| Ok(served.clone()));
    api.expect_add_reaction()
        .returning(|_, _, _| Ok(ReactionId::new("r9")));
    api.expect_remove_reaction()
        .withf(|_, id| id == &ReactionId::new("r9"))
        .returning(|_, _| Ok(()));

    let session = session_for(Some("ada")).await;
    let mut board = BoardService::new(Arc::new(api), quiet_telemetry(), session);
    board.load().await.expect("load");

    let parent = ParentRef::Post(PostId::new("p1"));

    board.choose_reaction(&parent, ReactionKind::Laugh).await;
    {
        let posts = &board.snapshot().expect("loaded").posts;
        let agg = tree::find_reactions(posts, &parent).expect("post present");
        assert_eq!(agg.count_of(ReactionKind::Laugh), 3);
        assert_eq!(
            agg.my_reaction(ReactionKind::Laugh),
            Some(&ReactionId::new("r9"))
        );
    }

    board.retract_reaction(&parent, ReactionKind::Laugh).await;
    {
        let posts = &board.snapshot().expect("loaded").posts;
        let agg = tree::find_reactions(posts, &parent).expect("post present");
        assert_eq!(agg.count_of(ReactionKind::Laugh), 2);
        assert!(agg.my_reaction(ReactionKind::Laugh).is_none());
    }
}

/// A confirmed reply lands under its parent at depth, the sibling subtree
/// keeps pointer identity, and the node expands so the reply is visible.
#[tokio::test]
async fn confirmed_reply_appends_expands_and_shares_siblings() {
    let b = fixtures::comment("B", "u1", vec![]);
    let c = fixtures::comment("C", "u1", vec![]);
    let a = fixtures::comment("A", "u1", vec![b, c]);
    let snapshot = fixtures::snapshot(
        vec![fixtures::post(
            "p1",
            domains::reactions::ReactionAggregate::default(),
            vec![a],
        )],
        vec![fixtures::user("u1", "ada")],
    );

    let text: String = Sentence(1..3).fake();
    let reply_text = text.clone();

    let mut api = MockBoardApi::new();
    let served = snapshot.clone();
    api.expect_fetch_board()
        .returning(move |_| Ok(served.clone()));
    api.expect_create_comment()
        .returning(move |_, _, body| {
            let mut created = (*fixtures::comment("D", "u1", vec![])).clone();
            created.text = Some(body.to_string());
            created.is_mine = true;
            Ok(created)
        });

    let session = session_for(Some("ada")).await;
    let mut board = BoardService::new(Arc::new(api), quiet_telemetry(), session);
    board.load().await.expect("load");

    let c_before = board.snapshot().expect("loaded").posts[0].comments[0].replies[1].clone();
    let parent = ParentRef::Comment(CommentId::new("B"));

    board.begin_reply(&parent).await;
    board.submit_reply(&parent, &reply_text).await;

    let posts = &board.snapshot().expect("loaded").posts;
    let a = &posts[0].comments[0];
    let b = &a.replies[0];
    assert_eq!(b.replies.len(), 1);
    assert_eq!(b.replies[0].text.as_deref(), Some(text.trim()));
    assert!(Arc::ptr_eq(&c_before, &a.replies[1]));

    let state = board.view().node(&parent);
    assert!(state.expanded);
    assert!(!state.composing_reply);
}

/// The session gate: while anonymous, toggling the composer never mutates
/// node state and raises exactly one ephemeral message; a submit attempt
/// never reaches the transport.
#[tokio::test]
async fn anonymous_visitors_are_gated_with_a_single_toast() {
    let snapshot = fixtures::snapshot(
        vec![fixtures::post("p1", fixtures::laugh_counts(1), vec![])],
        vec![],
    );
    let mut api = MockBoardApi::new();
    let served = snapshot.clone();
    api.expect_fetch_board()
        .returning(move |_| Ok(served.clone()));
    // No mutation expectations: any create/add call panics the test.

    let session = session_for(None).await;
    let mut board = BoardService::new(Arc::new(api), quiet_telemetry(), session);
    board.load().await.expect("load");

    let parent = ParentRef::Post(PostId::new("p1"));
    board.begin_reply(&parent).await;

    assert_eq!(board.view().node(&parent), NodeUiState::default());
    assert_eq!(board.view().toasts().len(), 1);

    board.submit_reply(&parent, "anonymous words").await;
    assert_eq!(board.view().toasts().len(), 2);
    assert_eq!(
        board.snapshot().expect("loaded").posts[0].comments.len(),
        0
    );
}

/// Ownership marking: after load, comments authored by the session user
/// carry `is_mine`, resolved through the roster.
#[tokio::test]
async fn load_derives_comment_ownership_from_the_roster() {
    let mine = fixtures::comment("c1", "u1", vec![]);
    let theirs = fixtures::comment("c2", "u2", vec![]);
    let snapshot = fixtures::snapshot(
        vec![fixtures::post(
            "p1",
            domains::reactions::ReactionAggregate::default(),
            vec![mine, theirs],
        )],
        vec![fixtures::user("u1", "ada"), fixtures::user("u2", "grace")],
    );

    let mut api = MockBoardApi::new();
    let served = snapshot.clone();
    api.expect_fetch_board()
        .returning(move |_| Ok(served.clone()));

    let session = session_for(Some("ada")).await;
    let mut board = BoardService::new(Arc::new(api), quiet_telemetry(), session);
    board.load().await.expect("load");

    let comments = &board.snapshot().expect("loaded").posts[0].comments;
    assert!(comments[0].is_mine);
    assert!(!comments[1].is_mine);
}

/// Transport failures on mutations are abandoned silently: no toast, no
/// tree change, just a log line and a telemetry record.
#[tokio::test]
async fn failed_reaction_is_abandoned_without_ui_noise() {
    let snapshot = fixtures::snapshot(
        vec![fixtures::post("p1", fixtures::laugh_counts(2), vec![])],
        vec![],
    );
    let mut api = MockBoardApi::new();
    let served = snapshot.clone();
    api.expect_fetch_board()
        .returning(move |_| Ok(served.clone()));
    api.expect_add_reaction()
        .returning(|_, _, _| Err(AppError::Transport("timed out".to_string())));

    let session = session_for(Some("ada")).await;
    let mut board = BoardService::new(Arc::new(api), quiet_telemetry(), session);
    board.load().await.expect("load");

    let parent = ParentRef::Post(PostId::new("p1"));
    board.choose_reaction(&parent, ReactionKind::Wow).await;

    assert!(board.view().toasts().is_empty());
    let agg = tree::find_reactions(&board.snapshot().expect("loaded").posts, &parent)
        .expect("post present");
    assert_eq!(agg.count_of(ReactionKind::Wow), 0);
}
