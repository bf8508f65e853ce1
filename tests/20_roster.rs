mod common;

use std::sync::Arc;

use uuid::Uuid;

use common::{student, FailKind, FakeStudentStore};
use gestao_alunos_rust::services::{AccessResolution, RosterPhase, RosterService};

fn resolution(is_admin: bool) -> AccessResolution {
    AccessResolution {
        user_id: Uuid::new_v4(),
        display_name: Some("maria".to_string()),
        is_admin,
    }
}

#[tokio::test]
async fn non_admin_session_never_triggers_a_list_fetch() {
    let store = Arc::new(FakeStudentStore::default());
    let mut roster = RosterService::new(store.clone());

    roster.activate(&resolution(false)).await.unwrap();
    assert_eq!(roster.phase(), RosterPhase::Denied);
    assert_eq!(store.list_call_count(), 0);

    // Even an explicit reload request stays away from the store.
    roster.reload().await.unwrap();
    assert_eq!(store.list_call_count(), 0);
}

#[tokio::test]
async fn activation_loads_the_roster_ordered_by_name() {
    let store = Arc::new(FakeStudentStore::seeded(vec![
        student("Carla Dias", "3"),
        student("Ana Lima", "1"),
        student("Bruno Costa", "2"),
    ]));
    let mut roster = RosterService::new(store.clone());

    roster.activate(&resolution(true)).await.unwrap();
    assert_eq!(roster.phase(), RosterPhase::Ready);
    let names: Vec<&str> = roster.students().iter().map(|s| s.nome.as_str()).collect();
    assert_eq!(names, vec!["Ana Lima", "Bruno Costa", "Carla Dias"]);
    assert_eq!(store.list_call_count(), 1);
}

#[tokio::test]
async fn reload_failure_keeps_the_last_known_roster() {
    let store = Arc::new(FakeStudentStore::seeded(vec![
        student("Ana Lima", "1"),
        student("Bruno Costa", "2"),
    ]));
    let mut roster = RosterService::new(store.clone());
    roster.activate(&resolution(true)).await.unwrap();

    store.fail_next_list(FailKind::Remote);
    let failure = roster.reload().await.unwrap_err();
    assert_eq!(failure.title, "Erro ao carregar alunos");
    assert_eq!(roster.phase(), RosterPhase::Error);
    assert_eq!(roster.students().len(), 2);
    assert!(roster.last_error().is_some());

    // The next successful reload recovers.
    roster.reload().await.unwrap();
    assert_eq!(roster.phase(), RosterPhase::Ready);
    assert!(roster.last_error().is_none());
}

#[tokio::test]
async fn delete_reloads_from_the_source_of_truth() {
    let victim = student("Bruno Costa", "2");
    let victim_id = victim.id;
    let store = Arc::new(FakeStudentStore::seeded(vec![
        student("Ana Lima", "1"),
        victim,
    ]));
    let mut roster = RosterService::new(store.clone());
    roster.activate(&resolution(true)).await.unwrap();

    let confirmation = roster.remove(victim_id).await.unwrap();
    assert_eq!(confirmation.title, "Aluno excluído com sucesso");
    assert_eq!(store.removals.lock().unwrap().as_slice(), &[victim_id]);

    // One fetch on activation, one after the delete.
    assert_eq!(store.list_call_count(), 2);
    assert!(roster.students().iter().all(|s| s.id != victim_id));
}

#[tokio::test]
async fn delete_denied_by_policy_reports_permission_and_keeps_the_roster() {
    let victim = student("Bruno Costa", "2");
    let victim_id = victim.id;
    let store = Arc::new(FakeStudentStore::seeded(vec![
        student("Ana Lima", "1"),
        victim,
    ]));
    let mut roster = RosterService::new(store.clone());
    roster.activate(&resolution(true)).await.unwrap();

    store.fail_next_mutation(FailKind::PermissionDenied);
    let failure = roster.remove(victim_id).await.unwrap_err();
    assert_eq!(failure.title, "Erro ao excluir aluno");
    assert!(failure
        .description
        .as_deref()
        .unwrap_or_default()
        .contains("permissão"));

    // No reload was issued and nothing changed locally.
    assert_eq!(store.list_call_count(), 1);
    assert_eq!(roster.students().len(), 2);
}
