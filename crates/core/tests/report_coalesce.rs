use hashcheck_core::analysis::{NativeBuckets, PassKind, Verdict};
use hashcheck_core::model::{CompiledModule, CompilerIdentity, HashAlgorithm, Language};
use hashcheck_core::report::{coalesce, findings_for, Level, RuleDescriptor, RULE_ID};

fn msvc() -> CompilerIdentity {
    CompilerIdentity::new("Microsoft (R) Optimizing Compiler", Some("19.29.30133.0".into()))
}

fn clang() -> CompilerIdentity {
    CompilerIdentity::new("clang-cl", Some("17.0.1".into()))
}

fn obj(name: &str, compiler: CompilerIdentity) -> CompiledModule {
    CompiledModule::new(name, Language::Cxx)
        .with_source(format!("{name}.cpp"), HashAlgorithm::Sha1)
        .with_compiler(compiler)
}

#[test]
fn coalesce_groups_by_compiler_in_first_seen_order() {
    let modules = vec![
        obj("b.obj", clang()),
        obj("a.obj", msvc()),
        obj("c.obj", clang()),
        obj("d.obj", msvc()).with_library("util.lib"),
    ];
    let text = coalesce(&modules);
    assert_eq!(
        text,
        "clang-cl (17.0.1) : b.obj, c.obj\n\
         Microsoft (R) Optimizing Compiler (19.29.30133.0) : a.obj, d.obj (util.lib)"
    );
}

#[test]
fn coalesce_drops_duplicate_modules() {
    let a = obj("a.obj", msvc());
    let b = obj("b.obj", msvc());
    let with_dup = coalesce(&[a.clone(), b.clone(), a.clone()]);
    let without_dup = coalesce(&[a, b]);
    assert_eq!(with_dup, without_dup);
    assert_eq!(with_dup.matches("a.obj").count(), 1);
}

#[test]
fn coalesce_keeps_same_object_name_from_different_libraries() {
    let modules = vec![
        obj("init.obj", msvc()).with_library("one.lib"),
        obj("init.obj", msvc()).with_library("two.lib"),
    ];
    let text = coalesce(&modules);
    assert!(text.contains("init.obj (one.lib)"));
    assert!(text.contains("init.obj (two.lib)"));
}

#[test]
fn coalesce_labels_unknown_compiler() {
    let module =
        CompiledModule::new("x.obj", Language::C).with_source("x.c", HashAlgorithm::Md5);
    assert_eq!(coalesce(&[module]), "Unknown compiler : x.obj");
}

#[test]
fn pass_verdicts_map_to_single_pass_finding() {
    for kind in [PassKind::Managed, PassKind::Native] {
        let findings = findings_for("app.exe", &Verdict::Pass { kind });
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].level, Level::Pass);
        assert_eq!(findings[0].rule_id, RULE_ID);
        assert!(findings[0].message.contains(&format!("is a {} binary", kind.as_str())));
    }
}

#[test]
fn managed_failure_maps_to_single_error() {
    let findings = findings_for("app.dll", &Verdict::Fail { algorithm: HashAlgorithm::Sha1 });
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].level, Level::Error);
    assert!(findings[0].message.contains("'app.dll' is a managed binary"));
    assert!(findings[0].message.contains("SHA-1"));
}

#[test]
fn native_result_reports_each_non_empty_bucket_warning_first() {
    let buckets = NativeBuckets {
        warn: vec![obj("lib.obj", msvc()).with_library("dep.lib")],
        error: vec![obj("main.obj", msvc())],
    };
    let findings = findings_for("app.exe", &Verdict::NativeResult { buckets });
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].level, Level::Warning);
    assert!(findings[0].message.contains("lib.obj (dep.lib)"));
    assert_eq!(findings[1].level, Level::Error);
    assert!(findings[1].message.contains("main.obj"));
    assert!(!findings[1].message.contains("lib.obj"));
}

#[test]
fn native_result_with_only_error_bucket_has_one_finding() {
    let buckets = NativeBuckets { warn: vec![], error: vec![obj("main.obj", msvc())] };
    let findings = findings_for("app.exe", &Verdict::NativeResult { buckets });
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].level, Level::Error);
    assert!(findings[0].message.contains("/ZH:SHA_256"));
}

#[test]
fn rule_descriptor_has_no_options() {
    let rule = RuleDescriptor::current();
    assert_eq!(rule.id, "BA2004");
    assert_eq!(rule.name, "EnableSecureSourceCodeHashing");
    assert!(rule.options.is_empty());
    assert!(rule.description.contains("SHA-256"));
}

#[test]
fn findings_serialize_level_in_lowercase() {
    let findings = findings_for("app.exe", &Verdict::Pass { kind: PassKind::Native });
    let json = serde_json::to_value(&findings).unwrap();
    assert_eq!(json[0]["level"], "pass");
}
