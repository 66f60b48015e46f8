use super::*;
use crate::model::request::SeriesSpec;

#[test]
fn render_mode_parses() {
    assert_eq!("cold".parse::<RenderMode>().unwrap(), RenderMode::Cold);
    assert_eq!("Warm".parse::<RenderMode>().unwrap(), RenderMode::Warm);
    assert_eq!("preload".parse::<RenderMode>().unwrap(), RenderMode::Warm);
    assert!(matches!(
        "hot".parse::<RenderMode>(),
        Err(BridgeError::Config(_))
    ));
}

#[tokio::test]
async fn missing_runtime_is_environment_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = SupervisorConfig::default();
    config.environment.project_root = Some(dir.path().to_path_buf());
    config.environment.ambient = Vec::new();
    let sup = Supervisor::new(config);

    assert!(!sup.is_available().await);
    let err = sup
        .render(&ChartRequest::default(), RenderMode::Cold, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Environment(_)));
}

#[cfg(unix)]
mod unix {
    use super::*;
    use crate::test_support::write_script;
    use std::path::Path;

    struct Fixture {
        dir: tempfile::TempDir,
        sup: Supervisor,
    }

    impl Fixture {
        /// Supervisor whose runtime is `/bin/sh <script>`; `{dir}` in `body` is the scratch dir.
        fn new(body: &str, tweak: impl FnOnce(&mut SupervisorConfig)) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let body = body.replace("{dir}", &dir.path().display().to_string());
            let script = write_script(dir.path(), "worker.sh", &body);
            let mut config = SupervisorConfig::default();
            config.worker.request_dir = Some(dir.path().join("requests"));
            config.worker.startup_timeout_ms = 2_000;
            tweak(&mut config);
            let desc = EnvironmentDescriptor {
                launch_args: vec![script.display().to_string()],
                ..EnvironmentDescriptor::ambient("/bin/sh")
            };
            let sup = Supervisor::with_environment(config, desc);
            Self { dir, sup }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn read(&self, name: &str) -> String {
            std::fs::read_to_string(self.path(name)).unwrap()
        }
    }

    fn request() -> ChartRequest {
        ChartRequest::builder()
            .title("Supervised")
            .series(SeriesSpec::new("A", vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]))
            .build()
            .unwrap()
    }

    const SECS_5: Duration = Duration::from_secs(5);

    const COLD_OK: &str = r#"echo "$@" > "{dir}/args"
cp "$1" "{dir}/seen.json"
touch "{dir}/chart.png"
echo "loading"
echo "Chart generated: {dir}/chart.png""#;

    const WARM: &str = r#"[ "$1" = "--preload" ] || exit 9
echo "$@" > "{dir}/args"
echo "Chart backend ready"
n=0
while read line; do
  [ "$line" = "shutdown" ] && exit 0
  n=$((n+1))
  touch "{dir}/warm_$n.png"
  echo "job $n"
  echo "Chart generated: {dir}/warm_$n.png"
done"#;

    #[tokio::test]
    async fn cold_render_relays_success_line() {
        let fx = Fixture::new(COLD_OK, |c| {
            c.worker.fast = true;
            c.worker.output_dir = Some(PathBuf::from("/charts"));
        });
        let out = fx
            .sup
            .render_sized(
                &request(),
                RenderSize::new(640, 480, 96),
                RenderMode::Cold,
                SECS_5,
            )
            .await
            .unwrap();
        assert_eq!(out.image_path, fx.path("chart.png"));
        assert_eq!(out.diagnostics, ["loading"]);

        let args = fx.read("args");
        let args: Vec<&str> = args.split_whitespace().collect();
        assert_eq!(args[1..], ["640", "480", "96", "--fast", "--output-dir", "/charts"]);
        assert!(!Path::new(args[0]).exists(), "request file should be removed");

        let seen = ChartRequest::parse(&fx.read("seen.json")).unwrap();
        assert_eq!(seen, request());
    }

    #[tokio::test]
    async fn invalid_request_never_launches() {
        let fx = Fixture::new(COLD_OK, |_| {});
        let mut req = request();
        req.x_min = Some(1.0);
        req.x_max = Some(1.0);
        let err = fx.sup.render(&req, RenderMode::Cold, SECS_5).await.unwrap_err();
        assert!(matches!(err, BridgeError::Protocol(_)));
        assert!(!fx.path("args").exists());

        let err = fx
            .sup
            .render_json("[1, 2]", RenderMode::Cold, SECS_5)
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Protocol(_)));
    }

    #[tokio::test]
    async fn cold_timeout_kills_worker() {
        let fx = Fixture::new(r#"echo $$ > "{dir}/pid"; exec sleep 30"#, |_| {});
        let started = Instant::now();
        let err = fx
            .sup
            .render(&request(), RenderMode::Cold, Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn cold_crash_carries_stderr() {
        let fx = Fixture::new("echo 'Traceback: boom' >&2\nexit 1", |_| {});
        let err = fx
            .sup
            .render(&request(), RenderMode::Cold, SECS_5)
            .await
            .unwrap_err();
        assert!(matches!(&err, BridgeError::Render(m) if m.contains("Traceback: boom")), "{err:?}");
    }

    #[tokio::test]
    async fn cold_exit_codes_map_to_kinds() {
        let fx = Fixture::new("exit 2", |_| {});
        let err = fx.sup.render(&request(), RenderMode::Cold, SECS_5).await.unwrap_err();
        assert!(matches!(err, BridgeError::Protocol(_)));

        let fx = Fixture::new("exit 3", |_| {});
        let err = fx.sup.render(&request(), RenderMode::Cold, SECS_5).await.unwrap_err();
        assert!(matches!(err, BridgeError::Io(_)));
    }

    #[tokio::test]
    async fn cold_success_without_result_line_fails() {
        let fx = Fixture::new("echo 'all done'", |_| {});
        let err = fx.sup.render(&request(), RenderMode::Cold, SECS_5).await.unwrap_err();
        assert!(matches!(err, BridgeError::Render(_)));

        let fx = Fixture::new(r#"echo "Chart generated: {dir}/missing.png""#, |_| {});
        let err = fx.sup.render(&request(), RenderMode::Cold, SECS_5).await.unwrap_err();
        assert!(matches!(err, BridgeError::Render(_)));
    }

    #[tokio::test]
    async fn warm_worker_serves_consecutive_requests() {
        let fx = Fixture::new(WARM, |c| c.worker.idle_timeout_secs = 600);
        fx.sup.warm_up().await.unwrap();
        let pid = fx.sup.warm_worker_pid().await;
        assert!(pid.is_some());
        assert_eq!(fx.sup.warm_state().await, Some(WorkerState::Ready));
        assert_eq!(fx.read("args").trim(), "--preload --idle-timeout 600");

        let a = fx.sup.render(&request(), RenderMode::Warm, SECS_5).await.unwrap();
        let b = fx.sup.render(&request(), RenderMode::Warm, SECS_5).await.unwrap();
        assert_eq!(a.image_path, fx.path("warm_1.png"));
        assert_eq!(b.image_path, fx.path("warm_2.png"));
        assert_eq!(b.diagnostics, ["job 2"]);
        assert_eq!(fx.sup.warm_worker_pid().await, pid);

        fx.sup.shutdown().await;
        assert_eq!(fx.sup.warm_state().await, None);
    }

    #[tokio::test]
    async fn concurrent_warm_renders_are_serialized() {
        let fx = Fixture::new(WARM, |_| {});
        let other = fx.sup.clone();
        let req = request();
        let (a, b) = tokio::join!(
            fx.sup.render(&req, RenderMode::Warm, SECS_5),
            other.render(&req, RenderMode::Warm, SECS_5),
        );
        let mut paths = vec![a.unwrap().image_path, b.unwrap().image_path];
        paths.sort();
        assert_eq!(paths, [fx.path("warm_1.png"), fx.path("warm_2.png")]);
        fx.sup.shutdown().await;
    }

    #[tokio::test]
    async fn warm_crash_is_replaced_on_next_request() {
        let body = format!(
            "{}\n{}",
            r#"if [ ! -f "{dir}/crashed" ]; then
  echo "Chart backend ready"
  read line
  touch "{dir}/crashed"
  echo "segfault in renderer" >&2
  exit 1
fi"#,
            WARM.replacen(r#"echo "$@" > "{dir}/args""#, "", 1)
        );
        let fx = Fixture::new(&body, |_| {});
        let err = fx
            .sup
            .render(&request(), RenderMode::Warm, SECS_5)
            .await
            .unwrap_err();
        assert!(matches!(&err, BridgeError::Render(m) if m.contains("segfault")), "{err:?}");
        assert_eq!(fx.sup.warm_state().await, None);

        let out = fx.sup.render(&request(), RenderMode::Warm, SECS_5).await.unwrap();
        assert_eq!(out.image_path, fx.path("warm_1.png"));
        fx.sup.shutdown().await;
    }

    #[tokio::test]
    async fn rejected_job_keeps_warm_worker() {
        let fx = Fixture::new(
            r#"echo "Chart backend ready"
while read line; do
  [ "$line" = "shutdown" ] && exit 0
  echo "Chart failed (render): unknown color 'blurple'"
done"#,
            |_| {},
        );
        let err = fx
            .sup
            .render(&request(), RenderMode::Warm, SECS_5)
            .await
            .unwrap_err();
        assert!(matches!(&err, BridgeError::Render(m) if m == "unknown color 'blurple'"));
        assert_eq!(fx.sup.warm_state().await, Some(WorkerState::Ready));
        fx.sup.shutdown().await;
    }

    #[tokio::test]
    async fn warm_job_timeout_discards_worker() {
        let fx = Fixture::new(
            "echo \"Chart backend ready\"\nread line\nexec sleep 30",
            |_| {},
        );
        let err = fx
            .sup
            .render(&request(), RenderMode::Warm, Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Timeout(_)));
        assert_eq!(fx.sup.warm_state().await, None);
    }

    #[tokio::test]
    async fn warm_startup_timeout() {
        let fx = Fixture::new("exec sleep 30", |c| c.worker.startup_timeout_ms = 300);
        let err = fx.sup.warm_up().await.unwrap_err();
        assert!(matches!(err, BridgeError::Timeout(_)));
        assert_eq!(fx.sup.warm_state().await, None);
    }

    #[tokio::test]
    async fn stale_warm_worker_is_replaced() {
        let fx = Fixture::new(WARM, |c| {
            c.worker.idle_timeout_secs = 1;
            c.worker.idle_margin_secs = 1;
        });
        fx.sup.warm_up().await.unwrap();
        let first = fx.sup.warm_worker_pid().await;
        fx.sup.render(&request(), RenderMode::Warm, SECS_5).await.unwrap();
        assert_ne!(fx.sup.warm_worker_pid().await, first);
        fx.sup.shutdown().await;
    }
}
