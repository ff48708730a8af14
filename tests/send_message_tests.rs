use std::sync::Arc;

use chatlog::{
    ChatLog, ChatRepository, ChatTarget, DomainError, InMemoryStore, MockCompletion, MockReply,
    SendMessageUseCase,
};

fn setup(completion: MockCompletion) -> (Arc<ChatRepository>, SendMessageUseCase) {
    let repo = Arc::new(ChatRepository::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(completion),
    ));
    let use_case = SendMessageUseCase::new(repo.clone());
    (repo, use_case)
}

#[tokio::test]
async fn new_target_creates_chat_and_stores_answer() {
    let (repo, use_case) = setup(MockCompletion::answering("42"));

    let turn = use_case
        .execute("what?", ChatTarget::New)
        .await
        .expect("send");

    assert_eq!(turn.answer(), Some("42"));
    assert_eq!(
        turn.chat_log_list,
        vec![ChatLog::user("what?"), ChatLog::assistant("42")]
    );

    let stored = repo.find(&turn.chat_id).await.expect("find").expect("chat exists");
    assert_eq!(stored.chat_log_list(), turn.chat_log_list.as_slice());
}

#[tokio::test]
async fn existing_target_sends_full_history() {
    let completion = Arc::new(MockCompletion::with_replies([
        MockReply::Content("first answer".into()),
        MockReply::Content("second answer".into()),
    ]));
    let repo = Arc::new(ChatRepository::new(
        Arc::new(InMemoryStore::new()),
        completion.clone(),
    ));
    let use_case = SendMessageUseCase::new(repo.clone());

    let first = use_case
        .execute("question one", ChatTarget::New)
        .await
        .expect("first");
    let second = use_case
        .execute("question two", ChatTarget::Existing(first.chat_id.clone()))
        .await
        .expect("second");

    assert_eq!(second.chat_id, first.chat_id);
    assert_eq!(
        second.chat_log_list,
        vec![
            ChatLog::user("question one"),
            ChatLog::assistant("first answer"),
            ChatLog::user("question two"),
            ChatLog::assistant("second answer"),
        ]
    );

    let requests = completion.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].len(), 3);
    assert_eq!(repo.list().await.expect("list").len(), 1);
}

#[tokio::test]
async fn last_target_continues_latest_chat() {
    let (repo, use_case) = setup(MockCompletion::new());

    use_case.execute("older", ChatTarget::New).await.expect("older");
    let latest = use_case.execute("newer", ChatTarget::New).await.expect("newer");

    let turn = use_case.execute("again", ChatTarget::Last).await.expect("again");

    assert_eq!(turn.chat_id, latest.chat_id);
    assert_eq!(turn.answer(), Some("echo: again"));
    assert_eq!(repo.list().await.expect("list").len(), 2);
}

#[tokio::test]
async fn last_target_starts_a_chat_when_none_exist() {
    let (repo, use_case) = setup(MockCompletion::new());

    let turn = use_case.execute("hello", ChatTarget::Last).await.expect("send");

    assert_eq!(repo.list().await.expect("list").len(), 1);
    assert_eq!(turn.chat_log_list.len(), 2);
}

#[tokio::test]
async fn invalid_input_touches_nothing() {
    let (repo, use_case) = setup(MockCompletion::new());

    let err = use_case.execute("x", ChatTarget::New).await.unwrap_err();

    assert!(matches!(err, DomainError::InvalidInput(_)));
    assert!(repo.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn unknown_chat_id_is_not_found() {
    let (_repo, use_case) = setup(MockCompletion::new());

    let err = use_case
        .execute("hello", ChatTarget::Existing("missing".into()))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn completion_failure_keeps_question_stored() {
    let (repo, use_case) = setup(MockCompletion::failing("offline"));

    let err = use_case.execute("what?", ChatTarget::New).await.unwrap_err();
    assert!(err.is_completion_failure());

    let chat = repo.last_chat().await.expect("last").expect("chat exists");
    assert_eq!(chat.chat_log_list(), &[ChatLog::user("what?")]);
}
