//! Tests over the fixture corpus under `tests/fixtures/`: five declaration
//! files compiled as one program, covering namespaces, class inheritance,
//! ambient modules, and a re-export hub that ties the units together.

use declc::{CompileOutput, EmitOptions, ExportRecord, IdmUnit, Program, SymbolDef, emit_document};
use once_cell::sync::Lazy;

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

const FIXTURES: [(&str, &str); 5] = [
    ("console.d.ts", include_str!("fixtures/console.d.ts")),
    ("events.d.ts", include_str!("fixtures/events.d.ts")),
    ("geometry.d.ts", include_str!("fixtures/geometry.d.ts")),
    ("index.d.ts", include_str!("fixtures/index.d.ts")),
    ("net.d.ts", include_str!("fixtures/net.d.ts")),
];

fn fixture_program() -> Program {
    Lazy::force(&TRACING);
    let mut program = Program::new();
    for (name, source) in FIXTURES {
        program.add_unit(name, source);
    }
    program
}

fn unit_named<'a>(output: &'a CompileOutput, file: &str) -> &'a IdmUnit {
    output
        .document
        .units
        .iter()
        .find(|unit| unit.file == file)
        .unwrap_or_else(|| panic!("no unit for '{file}' in the document"))
}

fn record(name: &str, target: &str, from: &str) -> ExportRecord {
    ExportRecord {
        name: name.to_string(),
        target: target.to_string(),
        from: Some(from.to_string()),
    }
}

#[test]
fn the_fixture_corpus_compiles_without_diagnostics() {
    let output = fixture_program().compile();
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let files: Vec<&str> = output
        .document
        .units
        .iter()
        .map(|unit| unit.file.as_str())
        .collect();
    assert_eq!(
        files,
        ["console.d.ts", "events.d.ts", "geometry.d.ts", "index.d.ts", "net.d.ts"]
    );
}

#[test]
fn fixture_stable_emission_is_reproducible() {
    let options = EmitOptions::stable();
    let first = emit_document(&fixture_program().compile().document, &options)
        .expect("emission failed");
    let second = emit_document(&fixture_program().compile().document, &options)
        .expect("emission failed");
    assert_eq!(first, second);
    assert!(!first.contains("\"location\""), "stable mode keeps no locations");
}

#[test]
fn reexport_hub_surfaces_every_module() {
    let output = fixture_program().compile();
    let hub = unit_named(&output, "index.d.ts");
    assert!(hub.symbols.is_empty(), "the hub declares nothing of its own");
    assert_eq!(
        hub.exports,
        vec![
            record("EventKind", "EventKind", "./events"),
            record("Listener", "Listener", "./events"),
            record("Subscription", "Subscription", "./events"),
            record("Emitter", "Emitter", "./events"),
            record("BufferedEmitter", "BufferedEmitter", "./events"),
            record("BaseShape", "Shape", "./geometry"),
            record("Circle", "Circle", "./geometry"),
            record("netConnect", "net.connect", "net"),
        ]
    );
}

#[test]
fn class_inheritance_folds_fixture_members() {
    let output = fixture_program().compile();
    let events = unit_named(&output, "events.d.ts");

    let emitter = events
        .symbols
        .iter()
        .find(|symbol| symbol.name == "Emitter")
        .expect("missing Emitter");
    let SymbolDef::Class(base) = &emitter.def else {
        panic!("expected Emitter to be a class");
    };
    assert!(base.is_abstract);
    assert_eq!(base.constructors.len(), 1);
    assert!(base.constructors[0].parameters[0].optional);

    let buffered = events
        .symbols
        .iter()
        .find(|symbol| symbol.name == "BufferedEmitter")
        .expect("missing BufferedEmitter");
    let SymbolDef::Class(derived) = &buffered.def else {
        panic!("expected BufferedEmitter to be a class");
    };
    let names: Vec<&str> = derived
        .members
        .iter()
        .map(|member| member.name.as_str())
        .collect();
    assert_eq!(names, ["capacity", "emit", "listeners", "shared", "on", "once"]);
    let emit = &derived.members[1];
    assert!(emit.inherited_from.is_none(), "the override is an own member");
    assert!(!emit.is_abstract);
    let on = &derived.members[4];
    assert_eq!(on.inherited_from.as_deref(), Some("Emitter"));
}

#[test]
fn ambient_modules_keep_their_quoted_names() {
    let output = fixture_program().compile();
    let net = unit_named(&output, "net.d.ts");
    let module = net
        .symbols
        .iter()
        .find(|symbol| symbol.name == "net")
        .expect("missing the net module");
    let SymbolDef::Module(def) = &module.def else {
        panic!("expected an ambient module");
    };
    assert!(!def.shorthand);
    let names: Vec<&str> = def
        .members
        .iter()
        .map(|member| member.name.as_str())
        .collect();
    assert_eq!(names, ["Socket", "connect", "defaultTimeout"]);

    let legacy = net
        .symbols
        .iter()
        .find(|symbol| symbol.name == "net-legacy")
        .expect("missing the shorthand module");
    let SymbolDef::Module(def) = &legacy.def else {
        panic!("expected an ambient module");
    };
    assert!(def.shorthand);
    assert!(def.members.is_empty());
}

#[test]
fn emitted_json_nests_namespaces_and_enums() {
    let output = fixture_program().compile();
    let json = emit_document(&output.document, &EmitOptions::stable()).expect("emission failed");
    let value: serde_json::Value = serde_json::from_str(&json).expect("emitted JSON must parse");

    let console = &value["units"][0]["symbols"][0];
    assert_eq!(console["name"], "console");
    assert_eq!(console["kind"], "namespace");
    assert_eq!(console["visibility"], "exported");
    assert!(
        console["documentation"]["text"]
            .as_str()
            .is_some_and(|text| text.contains("Console logging surface")),
        "{console}"
    );

    let logger = &console["members"][0];
    assert_eq!(logger["qualifiedName"], "console.Logger");
    assert_eq!(logger["members"][2]["name"], "log");
    assert_eq!(
        logger["members"][2]["signatures"].as_array().map(Vec::len),
        Some(2)
    );

    let level = &console["members"][1];
    assert_eq!(level["name"], "LogLevel");
    assert_eq!(level["enumKind"], "numeric");
    assert_eq!(level["members"][2]["value"]["value"], 10);
    assert_eq!(level["members"][3]["value"]["value"], 11);

    let scheduler = &value["units"][0]["symbols"][1];
    assert_eq!(scheduler["name"], "scheduler");
    assert_eq!(scheduler["kind"], "constant");
    assert_eq!(scheduler["type"]["kind"], "typeQuery");
    assert_eq!(scheduler["type"]["target"], "setTimeout");
}

#[test]
fn sources_loaded_from_disk_compile_identically() {
    let dir = tempfile::tempdir().expect("tempdir");
    for (name, source) in FIXTURES {
        std::fs::write(dir.path().join(name), source).expect("write fixture");
    }
    let mut from_disk = Program::new();
    for (name, _) in FIXTURES {
        let text = std::fs::read_to_string(dir.path().join(name)).expect("read fixture");
        from_disk.add_unit(name, text);
    }
    let options = EmitOptions::stable();
    let disk = emit_document(&from_disk.compile().document, &options).expect("emission failed");
    let memory = emit_document(&fixture_program().compile().document, &options)
        .expect("emission failed");
    assert_eq!(disk, memory);
}
