#[cfg(test)]
mod tests {
    use eqtrack::libs::background::Background;
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    struct BackgroundTestContext {
        temp_dir: TempDir,
        runner: Background,
    }

    impl AsyncTestContext for BackgroundTestContext {
        async fn setup() -> Self {
            BackgroundTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
                runner: Background::new(),
            }
        }
    }

    #[test_context(BackgroundTestContext)]
    #[tokio::test]
    async fn test_job_result_is_recorded(ctx: &mut BackgroundTestContext) {
        let target = ctx.temp_dir.path().join("out.txt");
        let job_target = target.clone();

        let detail = ctx
            .runner
            .run("Write", move || {
                fs::write(&job_target, "done")?;
                Ok(job_target.display().to_string())
            })
            .await
            .unwrap();

        assert_eq!(detail, target.display().to_string());
        assert!(target.exists());
        let outcome = ctx.runner.last().unwrap();
        assert_eq!(outcome.label, "Write");
        assert_eq!(outcome.result, Ok(detail));
    }

    #[test_context(BackgroundTestContext)]
    #[tokio::test]
    async fn test_failure_is_reported(ctx: &mut BackgroundTestContext) {
        let result = ctx.runner.run("Broken", || Err(anyhow::anyhow!("disk full"))).await;

        assert!(result.is_err());
        assert_eq!(ctx.runner.last().unwrap().result, Err("disk full".to_string()));
    }

    #[test_context(BackgroundTestContext)]
    #[tokio::test]
    async fn test_spawned_jobs_share_the_log(ctx: &mut BackgroundTestContext) {
        let first = ctx.runner.spawn("First", || Ok("1".to_string()));
        let second = ctx.runner.spawn("Second", || Ok("2".to_string()));

        assert_eq!(first.await.unwrap().unwrap(), "1");
        assert_eq!(second.await.unwrap().unwrap(), "2");
        assert_eq!(ctx.runner.outcomes().len(), 2);
    }
}
