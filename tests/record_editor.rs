mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{student, Call, MockGateway};
use school_admin::AppError;
use school_admin::form::{get_path, merge_defaults, FormValue, InputEvent};
use school_admin::gateway::UploadRequest;
use school_admin::models::{ClassAssignment, GuardianType, RecordKind};
use school_admin::notify::{NoticeLog, Severity};
use school_admin::scope::Scope;
use school_admin::services::{Dashboard, EditorMode, RecordEditor};
use serde_json::json;

fn editor(gateway: &Arc<MockGateway>, notices: &Arc<NoticeLog>, kind: RecordKind) -> RecordEditor {
    RecordEditor::new(gateway.clone(), notices.clone(), kind, Scope::global())
}

fn photo() -> UploadRequest {
    UploadRequest::new("ali.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
}

#[test]
fn test_open_create_starts_from_the_full_template_on_the_first_tab() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Student);

    editor.open_create().unwrap();

    let session = editor.session().unwrap();
    assert_eq!(session.mode, EditorMode::Create);
    assert_eq!(session.active_tab, "personal");
    assert!(!session.submitting);
    for key in ["address", "parentInfo", "guardianInfo", "academicInfo", "medicalInfo", "documents"] {
        assert!(session.record.get(key).is_some(), "{} missing from template", key);
    }
    assert_eq!(editor.guardian_type(), Some(GuardianType::Parent));
}

#[test]
fn test_branch_scope_stamps_new_records() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = RecordEditor::new(gateway, notices, RecordKind::Teacher, Scope::branch("B7"));

    editor.open_create().unwrap();

    assert_eq!(editor.value_at("branchId"), Some(&FormValue::from("B7")));
}

#[test]
fn test_changing_tabs_leaves_the_record_alone() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Teacher);
    editor.open_create().unwrap();
    editor.edit_field("firstName", "Sara").unwrap();
    let before = editor.record().unwrap().clone();

    editor.change_tab("salary").unwrap();

    assert_eq!(editor.active_tab(), Some("salary"));
    assert!(editor.record().unwrap().same_branch(&before));
    assert!(matches!(editor.change_tab("payroll"), Err(AppError::UnknownTab(_))));
    assert_eq!(editor.active_tab(), Some("salary"));
}

#[tokio::test]
async fn test_creating_a_student_posts_the_whole_record_and_refreshes() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Student);
    editor.open_create().unwrap();

    editor.apply_input("firstName", InputEvent::text("Ali")).unwrap();
    editor.apply_input("lastName", InputEvent::text("Khan")).unwrap();
    editor.apply_input("email", InputEvent::text("ali@x.com")).unwrap();
    editor.apply_input("classId", InputEvent::select("C1")).unwrap();

    let refreshes = AtomicUsize::new(0);
    let saved = editor
        .submit(|_| async {
            refreshes.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

    let creates: Vec<FormValue> = gateway
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Create(payload) => Some(payload),
            _ => None,
        })
        .collect();
    assert_eq!(creates.len(), 1);
    let payload = &creates[0];
    assert_eq!(get_path(payload, "firstName"), Some(&FormValue::from("Ali")));
    assert_eq!(get_path(payload, "lastName"), Some(&FormValue::from("Khan")));
    assert_eq!(get_path(payload, "email"), Some(&FormValue::from("ali@x.com")));
    assert_eq!(get_path(payload, "classId"), Some(&FormValue::from("C1")));
    let template = RecordKind::Student.template().unwrap();
    for key in ["address", "parentInfo", "guardianInfo", "academicInfo", "medicalInfo"] {
        assert_eq!(payload.get(key), template.get(key), "{} should be sent empty", key);
    }

    assert_eq!(saved.record_id(), Some("id-1"));
    assert!(!editor.is_open());
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    assert!(notices.notices().iter().any(|n| n.severity == Severity::Success));
}

#[tokio::test]
async fn test_validation_failures_never_reach_the_gateway() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Student);
    editor.open_create().unwrap();
    editor.edit_field("firstName", "Ali").unwrap();
    editor.edit_field("email", "not-an-email").unwrap();

    let result = editor.submit(|_| async {}).await;

    match result {
        Err(AppError::Validation(problems)) => {
            assert!(problems.iter().any(|p| p.contains("Last name")));
            assert!(problems.iter().any(|p| p.contains("valid email")));
            assert!(problems.iter().any(|p| p.starts_with("Academic: Class")));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(gateway.calls().is_empty());
    assert!(editor.is_open());
    assert!(!editor.is_submitting());
    assert_eq!(notices.notices()[0].severity, Severity::Error);
}

#[tokio::test]
async fn test_rejected_save_keeps_the_edits_for_correction() {
    let gateway = Arc::new(MockGateway::new());
    gateway.reject_saves.store(true, Ordering::SeqCst);
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Student);
    editor.open_create().unwrap();
    for (path, value) in [("firstName", "Ali"), ("lastName", "Khan"), ("email", "ali@x.com"), ("classId", "C1")] {
        editor.edit_field(path, value).unwrap();
    }
    let before = editor.record().unwrap().clone();

    let refreshed = AtomicUsize::new(0);
    let result = editor
        .submit(|_| async {
            refreshed.fetch_add(1, Ordering::SeqCst);
        })
        .await;

    assert!(matches!(result, Err(AppError::Rejected(ref m)) if m == "Email already exists"));
    assert!(editor.is_open());
    assert!(!editor.is_submitting());
    assert_eq!(editor.record(), Some(&before));
    assert_eq!(refreshed.load(Ordering::SeqCst), 0);
    assert!(notices.notices().iter().any(|n| n.message == "Email already exists"));
}

#[tokio::test]
async fn test_editing_without_changes_sends_back_the_stored_record() {
    let stored = FormValue::from(json!({
        "_id": "s1",
        "firstName": "Ali",
        "lastName": "Khan",
        "email": "ali@x.com",
        "classId": "C1",
        "status": "active",
        "guardianType": "parent",
        "address": { "city": "Lahore" },
        "parentInfo": { "father": { "name": "Imran Khan", "phone": "0300" } }
    }));
    let gateway = Arc::new(MockGateway::with_records(vec![stored.clone()]));
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Student);

    editor.open_edit(stored.clone()).unwrap();
    assert_eq!(editor.mode(), Some(&EditorMode::Edit { id: "s1".to_string() }));
    editor.submit(|_| async {}).await.unwrap();

    let update = gateway
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::Update(id, payload) => Some((id, payload)),
            _ => None,
        })
        .expect("one PUT");
    assert_eq!(update.0, "s1");
    let expected = merge_defaults(&RecordKind::Student.template().unwrap(), &stored);
    assert_eq!(update.1, expected);
    for key in ["_id", "firstName", "lastName", "email", "classId", "status", "guardianType"] {
        assert_eq!(update.1.get(key), stored.get(key), "{} changed", key);
    }
    assert_eq!(get_path(&update.1, "address.city"), Some(&FormValue::from("Lahore")));
    assert_eq!(get_path(&update.1, "parentInfo.father.phone"), Some(&FormValue::from("0300")));
    assert_eq!(gateway.count(|c| matches!(c, Call::Create(_))), 0);
}

#[tokio::test]
async fn test_stored_timestamps_pass_date_validation() {
    let stored = FormValue::from(json!({
        "_id": "s1",
        "firstName": "Ali",
        "lastName": "Khan",
        "email": "ali@x.com",
        "classId": "C1",
        "dateOfBirth": "2010-05-01T00:00:00.000Z",
        "academicInfo": { "admissionDate": "2024-04-01T09:30:00+05:00" }
    }));
    let gateway = Arc::new(MockGateway::with_records(vec![stored.clone()]));
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Student);

    editor.open_edit(stored).unwrap();
    editor.submit(|_| async {}).await.unwrap();

    assert_eq!(gateway.count(|c| matches!(c, Call::Update(..))), 1);
}

#[test]
fn test_malformed_dates_are_still_rejected() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Teacher);
    editor.open_create().unwrap();
    for (path, value) in [("firstName", "Sara"), ("lastName", "Ahmed"), ("email", "sara@x.com")] {
        editor.edit_field(path, value).unwrap();
    }
    editor.edit_field("teacherProfile.joiningDate", "2019-13-45").unwrap();

    match editor.validate() {
        Err(AppError::Validation(problems)) => {
            assert_eq!(problems, vec!["Professional: Joining date must be a date (YYYY-MM-DD)".to_string()]);
        }
        other => panic!("expected a date problem, got {:?}", other),
    }
}

#[test]
fn test_open_edit_requires_a_server_id() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Student);

    let result = editor.open_edit(FormValue::from(json!({ "firstName": "Ali" })));

    assert!(matches!(result, Err(AppError::MissingId)));
    assert!(!editor.is_open());
}

#[test]
fn test_guardian_toggle_round_trip_keeps_parent_details() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Student);
    editor.open_create().unwrap();
    editor.edit_field("parentInfo.father.name", "Imran Khan").unwrap();
    editor.edit_field("parentInfo.mother.phone", "0321").unwrap();
    let parent_before = editor.value_at("parentInfo").unwrap().clone();

    editor.set_guardian_type(GuardianType::Guardian).unwrap();
    assert_eq!(editor.visible_guardian_branch(), Some("guardianInfo"));
    editor.edit_field("guardianInfo.name", "Uncle Tariq").unwrap();
    editor.set_guardian_type(GuardianType::Parent).unwrap();

    assert_eq!(editor.visible_guardian_branch(), Some("parentInfo"));
    assert_eq!(editor.value_at("parentInfo"), Some(&parent_before));
    assert_eq!(editor.value_at("guardianInfo.name"), Some(&FormValue::from("Uncle Tariq")));
}

#[test]
fn test_guardian_branch_is_required_only_when_visible() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Student);
    editor.open_create().unwrap();
    for (path, value) in [("firstName", "Ali"), ("lastName", "Khan"), ("email", "ali@x.com"), ("classId", "C1")] {
        editor.edit_field(path, value).unwrap();
    }
    assert!(editor.validate().is_ok());

    editor.set_guardian_type(GuardianType::Guardian).unwrap();
    match editor.validate() {
        Err(AppError::Validation(problems)) => {
            assert_eq!(problems.len(), 2);
            assert!(problems.iter().all(|p| p.starts_with("Parent / Guardian:")));
        }
        other => panic!("expected guardian problems, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_photo_upload_leaves_the_record_unchanged() {
    let gateway = Arc::new(MockGateway::new());
    gateway.reject_uploads.store(true, Ordering::SeqCst);
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Student);
    editor.open_create().unwrap();
    let photo_before = editor.value_at("profilePhoto").unwrap().clone();

    let result = editor.attach_file("profilePhoto", photo()).await;

    assert!(matches!(result, Err(AppError::Rejected(_))));
    assert_eq!(editor.value_at("profilePhoto"), Some(&photo_before));
    assert!(!editor.is_uploading());
    assert!(!editor.is_submitting());
    assert_eq!(gateway.count(|c| matches!(c, Call::Upload(_))), 1);
    assert!(notices.notices().iter().any(|n| n.severity == Severity::Error && n.message.contains("Upload failed")));
}

#[tokio::test]
async fn test_accepted_photo_upload_stores_the_file_reference() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Student);
    editor.open_create().unwrap();

    editor.attach_file("profilePhoto", photo()).await.unwrap();

    assert_eq!(
        editor.value_at("profilePhoto.url"),
        Some(&FormValue::from("https://files.example.com/ali.png"))
    );
    assert_eq!(editor.value_at("profilePhoto.publicId"), Some(&FormValue::from("uploads/ali.png")));
    assert!(!editor.is_uploading());
}

#[tokio::test]
async fn test_documents_are_appended_and_filtered_out() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Teacher);
    editor.open_create().unwrap();

    editor
        .attach_document("cv", UploadRequest::new("cv.pdf", "application/pdf", b"%PDF".to_vec()))
        .await
        .unwrap();
    editor
        .attach_document("degree", UploadRequest::new("degree.pdf", "application/pdf", b"%PDF".to_vec()))
        .await
        .unwrap();

    let docs = editor.value_at("teacherProfile.documents").unwrap().as_list().unwrap().to_vec();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].get("type"), Some(&FormValue::from("cv")));
    assert_eq!(docs[1].get("name"), Some(&FormValue::from("degree.pdf")));
    assert!(docs[1].get("uploadedAt").and_then(FormValue::as_str).is_some());

    editor.remove_item("teacherProfile.documents", 0).unwrap();
    let docs = editor.value_at("teacherProfile.documents").unwrap().as_list().unwrap().to_vec();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].get("type"), Some(&FormValue::from("degree")));

    editor.remove_item("teacherProfile.documents", 5).unwrap();
    assert_eq!(editor.value_at("teacherProfile.documents").unwrap().as_list().unwrap().len(), 1);
}

#[test]
fn test_class_assignments_toggle_by_class_id() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Teacher);
    editor.open_create().unwrap();
    let math = ClassAssignment { class_id: "C1".into(), subject_id: "MATH".into(), section: None };
    let science = ClassAssignment { class_id: "C2".into(), subject_id: "SCI".into(), section: Some("B".into()) };

    assert!(editor.toggle_class(math.clone()).unwrap());
    assert!(editor.toggle_class(science).unwrap());
    assert_eq!(editor.value_at("teacherProfile.classes").unwrap().as_list().unwrap().len(), 2);

    let other_subject_same_class = ClassAssignment { subject_id: "PHY".into(), ..math };
    assert!(!editor.toggle_class(other_subject_same_class).unwrap());

    let classes = editor.value_at("teacherProfile.classes").unwrap().as_list().unwrap().to_vec();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].get("classId"), Some(&FormValue::from("C2")));
    assert_eq!(classes[0].get("section"), Some(&FormValue::from("B")));
}

#[test]
fn test_qualifications_list_accepts_new_rows() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Staff);
    editor.open_create().unwrap();
    let path = RecordKind::Staff.qualifications_path().unwrap();

    editor
        .push_item(path, FormValue::from(json!({ "degree": "", "institution": "", "year": "", "grade": "" })))
        .unwrap();
    editor.edit_field(&format!("{}.0.degree", path), "BCom").unwrap();

    assert_eq!(editor.value_at("staffProfile.qualifications.0.degree"), Some(&FormValue::from("BCom")));
}

#[test]
fn test_edits_on_a_closed_editor_are_rejected() {
    let gateway = Arc::new(MockGateway::new());
    let notices = Arc::new(NoticeLog::new());
    let mut editor = editor(&gateway, &notices, RecordKind::Student);

    assert!(matches!(editor.edit_field("firstName", "Ali"), Err(AppError::EditorClosed)));
    editor.open_create().unwrap();
    editor.close();
    assert!(editor.record().is_none());
}

#[tokio::test]
async fn test_dashboard_refetches_the_list_after_a_save() {
    let gateway = Arc::new(MockGateway::with_records(vec![student("s1", "Sana", "Iqbal")]));
    let notices = Arc::new(NoticeLog::new());
    let mut dashboard = Dashboard::new(
        gateway.clone(),
        notices.clone(),
        Arc::new(|_: &str| true),
        RecordKind::Student,
        Scope::global(),
        10,
    );
    dashboard.list.refresh().await.unwrap();
    assert_eq!(dashboard.list.rows().len(), 1);

    dashboard.editor.open_create().unwrap();
    for (path, value) in [("firstName", "Ali"), ("lastName", "Khan"), ("email", "ali@x.com"), ("classId", "C1")] {
        dashboard.editor.edit_field(path, value).unwrap();
    }
    dashboard.submit().await.unwrap();

    assert_eq!(gateway.lists(), 2);
    assert_eq!(dashboard.list.rows().len(), 2);
    assert!(!dashboard.editor.is_open());

    dashboard.open_edit("s1").await.unwrap();
    assert_eq!(dashboard.editor.value_at("firstName"), Some(&FormValue::from("Sana")));
}
