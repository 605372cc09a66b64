use std::{
    cell::RefCell,
    fs, io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use binary2::{
    driver::{compile_file, Driver},
    toolchain::{Assembler, Linker, ToolchainError},
    BuildOptions, CompilerConfig, Error, Stage,
};

fn unique_temp_dir(name: &str) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("binary2-{name}-{now}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// Records what it was asked to do and writes a placeholder artifact
#[derive(Default)]
struct FakeToolchain {
    calls: RefCell<Vec<String>>,
    fail_assemble: bool,
    fail_link: bool,
}

impl FakeToolchain {
    fn failing_assembler() -> FakeToolchain {
        FakeToolchain {
            fail_assemble: true,
            ..Default::default()
        }
    }

    fn failing_linker() -> FakeToolchain {
        FakeToolchain {
            fail_link: true,
            ..Default::default()
        }
    }

    fn failure(&self, program: &str) -> ToolchainError {
        ToolchainError::Spawn {
            program: PathBuf::from(program),
            source: io::Error::new(io::ErrorKind::NotFound, "fake toolchain failure"),
        }
    }
}

impl Assembler for FakeToolchain {
    fn assemble(&self, source: &Path, object: &Path) -> Result<(), ToolchainError> {
        assert!(source.exists(), "assembly should exist before assembling");
        self.calls
            .borrow_mut()
            .push(format!("as {} {}", source.display(), object.display()));
        if self.fail_assemble {
            return Err(self.failure("as"));
        }
        fs::write(object, b"object").expect("write object");
        Ok(())
    }
}

impl Linker for FakeToolchain {
    fn link(&self, objects: &[&Path], executable: &Path) -> Result<(), ToolchainError> {
        for object in objects {
            assert!(object.exists(), "object should exist before linking");
        }
        self.calls
            .borrow_mut()
            .push(format!("ld {} {}", objects[0].display(), executable.display()));
        if self.fail_link {
            return Err(self.failure("ld"));
        }
        fs::write(executable, b"executable").expect("write executable");
        Ok(())
    }
}

fn write_source(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("prog.bin2");
    fs::write(&path, text).expect("write source");
    path
}

#[test]
fn full_build_removes_intermediates() {
    let dir = unique_temp_dir("link");
    let input = write_source(&dir, "22226027 4");
    let mut options = BuildOptions::new(&input);
    options.output = Some(dir.join("prog"));

    let toolchain = FakeToolchain::default();
    let artifact = Driver::new(&options, &toolchain, &toolchain).run().unwrap();

    assert_eq!(artifact, dir.join("prog"));
    assert!(artifact.exists());
    assert!(!dir.join("prog.s").exists());
    assert!(!dir.join("prog.o").exists());
    assert_eq!(
        *toolchain.calls.borrow(),
        vec![
            format!("as {} {}", dir.join("prog.s").display(), dir.join("prog.o").display()),
            format!("ld {} {}", dir.join("prog.o").display(), dir.join("prog").display()),
        ]
    );
}

#[test]
fn compile_stage_stops_at_assembly() {
    let dir = unique_temp_dir("compile");
    let input = write_source(&dir, "6 7");
    let mut options = BuildOptions::new(&input);
    options.stage = Stage::Compile;
    options.output = Some(dir.join("custom.asm"));

    let toolchain = FakeToolchain::default();
    let artifact = Driver::new(&options, &toolchain, &toolchain).run().unwrap();

    assert_eq!(artifact, dir.join("custom.asm"));
    let asm = fs::read_to_string(&artifact).unwrap();
    assert!(asm.contains("\tjz .LE1\n.LB1:\n"));
    assert!(toolchain.calls.borrow().is_empty());
}

#[test]
fn assemble_stage_keeps_the_object() {
    let dir = unique_temp_dir("assemble");
    let input = write_source(&dir, "2");
    let mut options = BuildOptions::new(&input);
    options.stage = Stage::Assemble;

    let toolchain = FakeToolchain::default();
    let artifact = Driver::new(&options, &toolchain, &toolchain).run().unwrap();

    assert_eq!(artifact, dir.join("prog.o"));
    assert!(artifact.exists());
    assert!(!dir.join("prog.s").exists());
    assert_eq!(toolchain.calls.borrow().len(), 1);
}

#[test]
fn keep_intermediates_leaves_files() {
    let dir = unique_temp_dir("keep");
    let input = write_source(&dir, "2");
    let mut options = BuildOptions::new(&input);
    options.output = Some(dir.join("prog"));
    options.keep_intermediates = true;

    let toolchain = FakeToolchain::default();
    Driver::new(&options, &toolchain, &toolchain).run().unwrap();

    assert!(dir.join("prog.s").exists());
    assert!(dir.join("prog.o").exists());
}

#[test]
fn assembler_failure_is_propagated() {
    let dir = unique_temp_dir("as-fail");
    let input = write_source(&dir, "2");
    let options = BuildOptions::new(&input);

    let toolchain = FakeToolchain::failing_assembler();
    let err = Driver::new(&options, &toolchain, &toolchain)
        .run()
        .unwrap_err();

    assert!(matches!(err, Error::Toolchain(ToolchainError::Spawn { .. })));
    // linking never starts
    assert_eq!(toolchain.calls.borrow().len(), 1);
}

#[test]
fn failed_compile_leaves_no_assembly() {
    let dir = unique_temp_dir("bad");
    let input = write_source(&dir, "22 7");
    let asm = dir.join("prog.s");

    let err = compile_file(&input, &asm, &CompilerConfig::default()).unwrap_err();

    assert!(matches!(err, Error::Compile { .. }));
    assert!(err.to_string().contains("unmatched loop end at line 1, column 4"));
    assert!(!asm.exists());
}

#[test]
fn missing_source_names_the_path() {
    let dir = unique_temp_dir("missing");
    let input = dir.join("nope.bin2");

    let err = compile_file(&input, &dir.join("nope.s"), &CompilerConfig::default()).unwrap_err();

    match err {
        Error::Open { path, .. } => assert_eq!(path, input),
        other => panic!("expected open error, got {:?}", other),
    }
    assert!(!dir.join("nope.s").exists());
}

#[test]
fn linker_failure_is_propagated() {
    let dir = unique_temp_dir("ld-fail");
    let input = write_source(&dir, "2");
    let mut options = BuildOptions::new(&input);
    options.output = Some(dir.join("prog"));

    let toolchain = FakeToolchain::failing_linker();
    let err = Driver::new(&options, &toolchain, &toolchain)
        .run()
        .unwrap_err();

    assert!(matches!(err, Error::Toolchain(ToolchainError::Spawn { .. })));
    assert_eq!(toolchain.calls.borrow().len(), 2);
    // the assembly was consumed, the object wasn't
    assert!(!dir.join("prog.s").exists());
    assert!(dir.join("prog.o").exists());
    assert!(!dir.join("prog").exists());
}

#[test]
fn assembly_named_like_the_input_is_refused() {
    let dir = unique_temp_dir("clobber");
    let input = dir.join("prog.s");
    fs::write(&input, "22224").expect("write source");
    let mut options = BuildOptions::new(&input);
    options.stage = Stage::Compile;

    let toolchain = FakeToolchain::default();
    let err = Driver::new(&options, &toolchain, &toolchain)
        .run()
        .unwrap_err();

    assert!(matches!(err, Error::Overwrite { .. }));
    assert_eq!(fs::read_to_string(&input).unwrap(), "22224");
}

#[test]
fn output_flag_pointing_at_the_input_is_refused() {
    let dir = unique_temp_dir("clobber-o");
    let input = write_source(&dir, "6 2 7");

    for stage in [Stage::Compile, Stage::Assemble, Stage::Link] {
        let mut options = BuildOptions::new(&input);
        options.stage = stage;
        // spelled differently but the same file
        options.output = Some(dir.join(".").join("prog.bin2"));

        let toolchain = FakeToolchain::default();
        let err = Driver::new(&options, &toolchain, &toolchain)
            .run()
            .unwrap_err();

        assert!(matches!(err, Error::Overwrite { .. }), "stage {:?}", stage);
        assert!(toolchain.calls.borrow().is_empty());
        assert_eq!(fs::read_to_string(&input).unwrap(), "6 2 7");
    }
    assert!(!dir.join("prog.s").exists());
}

#[test]
fn compile_file_onto_itself_is_refused() {
    let dir = unique_temp_dir("same");
    let input = write_source(&dir, "6 2 7");

    let err = compile_file(&input, &input, &CompilerConfig::default()).unwrap_err();

    assert!(matches!(err, Error::Overwrite { .. }));
    assert!(err.to_string().ends_with("output would overwrite the input"));
    assert_eq!(fs::read_to_string(&input).unwrap(), "6 2 7");
}
