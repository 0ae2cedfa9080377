//! Pipeline orchestration.
//!
//! Stage order: resolve assets → build image → run builder → locate output →
//! overlay → pack. Each stage fails fast; the work area is dropped (and
//! removed) on every exit path, while the finished archive outlives it and
//! belongs to the caller.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use stackforge_core::{ArchiveArtifact, BuildRequest, Result};
use stackforge_engine::{ContainerEngine, TagStrategy};
use tracing::info;

use crate::archive;
use crate::assets::{AssetPaths, OVERLAY_SPEC};
use crate::locate;
use crate::overlay;
use crate::workarea::WorkArea;

/// Environment variable carrying the project name into the builder.
pub const ENV_APP_NAME: &str = "APP_NAME";
/// Environment variable carrying the combined flags string into the builder.
pub const ENV_INSTRUCTIONS: &str = "INSTRUCTIONS";

const DEFAULT_RECHECK_DELAY: Duration = Duration::from_millis(500);

/// Runs the whole assembly pipeline for one request at a time. Concurrent
/// invocations each get their own work area; with the default per-run tag
/// strategy they do not share any mutable state.
pub struct Assembler {
    assets_root: PathBuf,
    engine: Arc<dyn ContainerEngine>,
    tags: TagStrategy,
    recheck_delay: Duration,
}

impl Assembler {
    pub fn new(
        assets_root: impl Into<PathBuf>,
        engine: Arc<dyn ContainerEngine>,
        tags: TagStrategy,
    ) -> Self {
        Self {
            assets_root: assets_root.into(),
            engine,
            tags,
            recheck_delay: DEFAULT_RECHECK_DELAY,
        }
    }

    /// Override the output-locate recheck delay.
    pub fn with_recheck_delay(mut self, delay: Duration) -> Self {
        self.recheck_delay = delay;
        self
    }

    /// Assemble one project archive. Blocking; awaited external processes
    /// are the only long-latency steps.
    pub fn assemble(&self, request: &BuildRequest) -> Result<ArchiveArtifact> {
        let assets = AssetPaths::resolve(&self.assets_root)?;
        let work = WorkArea::create()?;
        let run_tag = self.tags.next();

        info!(
            project = request.project_name(),
            tag = %run_tag.tag,
            "building builder image"
        );
        self.engine
            .build(assets.builder_dir(), &run_tag.tag, request.build_args())?;

        info!(project = request.project_name(), "running builder");
        let env = vec![
            (ENV_APP_NAME.to_string(), request.project_name().to_string()),
            (ENV_INSTRUCTIONS.to_string(), request.flags_string()),
        ];
        let run_result = self.engine.run(&run_tag.tag, &env, work.path());
        if run_tag.remove_after_run {
            self.engine.remove_image(&run_tag.tag);
        }
        let output = run_result?;

        let project_dir = locate::locate(
            work.path(),
            request.project_name(),
            self.recheck_delay,
            &output.diagnostic(),
        )?;

        overlay::apply(&project_dir, &assets, OVERLAY_SPEC)?;

        let archive_path = archive::pack(&project_dir, work.path(), request.project_name())?;
        info!(
            project = request.project_name(),
            archive = %archive_path.display(),
            "project assembled"
        );
        Ok(ArchiveArtifact {
            path: archive_path,
            project_name: request.project_name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{full_asset_root, write};
    use stackforge_core::{Error, Result};
    use stackforge_engine::EngineOutput;
    use std::collections::{BTreeMap, BTreeSet};
    use std::path::Path;
    use std::sync::Mutex;

    const FAST: Duration = Duration::from_millis(10);

    #[derive(Default)]
    struct Calls {
        builds: Vec<String>,
        runs: Vec<(String, Vec<(String, String)>)>,
        removed: Vec<String>,
    }

    /// Spy engine: records invocations; `run` delegates to a closure that
    /// can populate the mount like the real builder would.
    struct SpyEngine<F: Fn(&Path) -> Result<EngineOutput>> {
        calls: Mutex<Calls>,
        on_run: F,
    }

    impl<F: Fn(&Path) -> Result<EngineOutput>> SpyEngine<F> {
        fn new(on_run: F) -> Self {
            Self {
                calls: Mutex::new(Calls::default()),
                on_run,
            }
        }
    }

    impl<F: Fn(&Path) -> Result<EngineOutput> + Send + Sync> ContainerEngine for SpyEngine<F> {
        fn build(
            &self,
            _context_dir: &Path,
            tag: &str,
            _build_args: &BTreeMap<String, String>,
        ) -> Result<EngineOutput> {
            self.calls.lock().unwrap().builds.push(tag.to_string());
            Ok(EngineOutput::default())
        }

        fn run(
            &self,
            tag: &str,
            env: &[(String, String)],
            mount_host_path: &Path,
        ) -> Result<EngineOutput> {
            self.calls
                .lock()
                .unwrap()
                .runs
                .push((tag.to_string(), env.to_vec()));
            (self.on_run)(mount_host_path)
        }

        fn remove_image(&self, tag: &str) {
            self.calls.lock().unwrap().removed.push(tag.to_string());
        }
    }

    fn request(name: &str, flags: &[&str]) -> BuildRequest {
        let mut args = BTreeMap::new();
        args.insert("PHP_VERSION".to_string(), "8.3".to_string());
        args.insert("NODE_VERSION".to_string(), "20".to_string());
        BuildRequest::new(
            name,
            args,
            flags.iter().map(|f| f.to_string()).collect(),
        )
        .unwrap()
    }

    /// Builder stand-in that writes a small known project tree.
    fn stub_builder(project: &str) -> impl Fn(&Path) -> Result<EngineOutput> {
        let project = project.to_string();
        move |mount: &Path| {
            let root = mount.join(&project);
            write(&root.join("composer.json"), "{}\n");
            write(&root.join("app/Http/Kernel.php"), "<?php\n");
            Ok(EngineOutput::default())
        }
    }

    #[test]
    fn missing_assets_fail_before_any_engine_call() {
        let missing = tempfile::tempdir().unwrap();
        let engine = Arc::new(SpyEngine::new(|_: &Path| Ok(EngineOutput::default())));
        let assembler = Assembler::new(
            missing.path().join("nope"),
            engine.clone(),
            TagStrategy::PerRun,
        );

        let err = assembler.assemble(&request("cfg-fail", &[])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let calls = engine.calls.lock().unwrap();
        assert!(calls.builds.is_empty());
        assert!(calls.runs.is_empty());
    }

    #[test]
    fn run_failure_carries_stderr_and_leaves_no_archive() {
        let assets = full_asset_root();
        let engine = Arc::new(SpyEngine::new(|_: &Path| {
            Err(Error::Run("composer blew up".to_string()))
        }));
        let assembler =
            Assembler::new(assets.path(), engine.clone(), TagStrategy::PerRun)
                .with_recheck_delay(FAST);

        let expected_archive = std::env::temp_dir().join("run-fail.zip");
        let _ = std::fs::remove_file(&expected_archive);

        let err = assembler.assemble(&request("run-fail", &[])).unwrap_err();
        match err {
            Error::Run(msg) => assert!(msg.contains("composer blew up")),
            other => panic!("expected Run error, got {other:?}"),
        }
        assert!(!expected_archive.exists());

        // Per-run tags are still cleaned up when the run fails.
        let calls = engine.calls.lock().unwrap();
        assert_eq!(calls.removed.len(), 1);
    }

    #[test]
    fn silent_builder_yields_output_not_found_with_listing() {
        let assets = full_asset_root();
        let engine = Arc::new(SpyEngine::new(|mount: &Path| {
            std::fs::write(mount.join("stray.log"), "noise").unwrap();
            Ok(EngineOutput {
                stdout: "generator done\n".into(),
                stderr: String::new(),
            })
        }));
        let assembler = Assembler::new(assets.path(), engine, TagStrategy::PerRun)
            .with_recheck_delay(FAST);

        let err = assembler.assemble(&request("ghost", &[])).unwrap_err();
        match err {
            Error::OutputNotFound { project, detail } => {
                assert_eq!(project, "ghost");
                assert!(detail.contains("stray.log"));
                assert!(detail.contains("generator done"));
            }
            other => panic!("expected OutputNotFound, got {other:?}"),
        }
    }

    #[test]
    fn builder_env_carries_name_and_joined_flags() {
        let assets = full_asset_root();
        let engine = Arc::new(SpyEngine::new(stub_builder("env-check")));
        let assembler =
            Assembler::new(assets.path(), engine.clone(), TagStrategy::PerRun)
                .with_recheck_delay(FAST);

        let artifact = assembler
            .assemble(&request("env-check", &["--react", "--npm"]))
            .unwrap();
        let _ = std::fs::remove_file(artifact.path);

        let calls = engine.calls.lock().unwrap();
        assert_eq!(calls.builds.len(), 1);
        let (run_tag, env) = &calls.runs[0];
        assert_eq!(run_tag, &calls.builds[0]);
        assert!(env.contains(&(ENV_APP_NAME.to_string(), "env-check".to_string())));
        assert!(env.contains(&(ENV_INSTRUCTIONS.to_string(), "--react --npm".to_string())));
    }

    #[test]
    fn fixed_tag_is_reused_and_never_removed() {
        let assets = full_asset_root();
        let engine = Arc::new(SpyEngine::new(stub_builder("fixed-tag")));
        let assembler = Assembler::new(
            assets.path(),
            engine.clone(),
            TagStrategy::Fixed("pinned-tag".into()),
        )
        .with_recheck_delay(FAST);

        assembler.assemble(&request("fixed-tag", &[])).unwrap();
        let artifact = assembler.assemble(&request("fixed-tag", &[])).unwrap();
        let _ = std::fs::remove_file(artifact.path);

        let calls = engine.calls.lock().unwrap();
        assert_eq!(calls.builds, vec!["pinned-tag", "pinned-tag"]);
        assert!(calls.removed.is_empty());
    }

    #[test]
    fn end_to_end_archive_holds_builder_and_overlay_files() {
        let assets = full_asset_root();
        let engine = Arc::new(SpyEngine::new(stub_builder("demo")));
        let assembler = Assembler::new(assets.path(), engine, TagStrategy::PerRun)
            .with_recheck_delay(FAST);

        let artifact = assembler.assemble(&request("demo", &[])).unwrap();
        assert_eq!(artifact.project_name, "demo");

        let file = std::fs::File::open(&artifact.path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        let names: BTreeSet<String> = archive.file_names().map(String::from).collect();

        let expected: BTreeSet<String> = [
            "demo/composer.json",
            "demo/app/Http/Kernel.php",
            "demo/nginx/default.conf",
            "demo/php-fpm/www.conf",
            "demo/dev.docker-compose.yml",
            "demo/template.docker-compose.yml",
            "demo/.github/workflows/ci.yml",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(names, expected);

        for name in &names {
            assert!(name.starts_with("demo/"));
            assert!(!name.contains(".."));
        }
        std::fs::remove_file(artifact.path).unwrap();
    }
}
