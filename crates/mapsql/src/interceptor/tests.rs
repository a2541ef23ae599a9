use std::sync::Mutex;

use super::*;
use crate::expr::{assign, col};
use crate::orm::{Orm, OrmConfig};
use crate::testing::{MockExecutor, User};
use crate::value::Value;

type Trace = Arc<Mutex<Vec<String>>>;

/// Records entry and exit around `next`.
struct Recorder {
    name: &'static str,
    trace: Trace,
}

impl Interceptor for Recorder {
    fn intercept<'a>(
        &'a self,
        ctx: &'a QueryContext<'a>,
        next: Next<'a>,
    ) -> BoxFuture<'a, OrmResult<QueryOutput>> {
        Box::pin(async move {
            self.trace.lock().unwrap().push(format!("{}:in", self.name));
            let out = next.run(ctx).await;
            self.trace.lock().unwrap().push(format!("{}:out", self.name));
            out
        })
    }
}

/// Answers SELECTs itself.
struct Canned;

impl Interceptor for Canned {
    fn intercept<'a>(
        &'a self,
        ctx: &'a QueryContext<'a>,
        next: Next<'a>,
    ) -> BoxFuture<'a, OrmResult<QueryOutput>> {
        Box::pin(async move {
            if ctx.kind == StatementKind::Select {
                return Ok(QueryOutput::Rows(Box::new(vec![User::new(42, "cached")])));
            }
            next.run(ctx).await
        })
    }
}

/// Replaces every SELECT with a fixed statement.
struct Redirect;

impl Interceptor for Redirect {
    fn intercept<'a>(
        &'a self,
        ctx: &'a QueryContext<'a>,
        next: Next<'a>,
    ) -> BoxFuture<'a, OrmResult<QueryOutput>> {
        Box::pin(async move {
            let query = Query::new("SELECT id, name FROM user_archive;", vec![]);
            let replaced = QueryContext::new(ctx.kind, &query);
            next.run(&replaced).await
        })
    }
}

struct DenyUpdates;

impl Interceptor for DenyUpdates {
    fn intercept<'a>(
        &'a self,
        ctx: &'a QueryContext<'a>,
        next: Next<'a>,
    ) -> BoxFuture<'a, OrmResult<QueryOutput>> {
        Box::pin(async move {
            if ctx.kind == StatementKind::Update {
                return Err(OrmError::aborted("updates are disabled"));
            }
            next.run(ctx).await
        })
    }
}

#[tokio::test]
async fn first_registered_runs_outermost() {
    let trace = Trace::default();
    let orm = Orm::with_config(
        OrmConfig::new()
            .interceptor(Recorder {
                name: "a",
                trace: trace.clone(),
            })
            .interceptor(Recorder {
                name: "b",
                trace: trace.clone(),
            }),
    );
    let exec = MockExecutor::new().with_rows(&["id"], vec![]);

    orm.select::<User>().get_multi(&exec).await.unwrap();
    assert_eq!(*trace.lock().unwrap(), ["a:in", "b:in", "b:out", "a:out"]);
}

#[tokio::test]
async fn short_circuit_skips_executor() {
    let orm = Orm::with_config(OrmConfig::new().interceptor(Canned));
    let exec = MockExecutor::new();

    let users = orm.select::<User>().get_multi(&exec).await.unwrap();
    assert_eq!(users, [User::new(42, "cached")]);
    assert!(exec.statements().is_empty());
}

#[tokio::test]
async fn wrong_output_shape_is_reported() {
    let orm = Orm::with_config(OrmConfig::new().interceptor(Canned));
    let exec = MockExecutor::new();

    // `get` expects a single entity, the interceptor produced a Vec.
    let err = orm.select::<User>().get(&exec).await.unwrap_err();
    assert!(matches!(err, OrmError::UnexpectedOutput(_)));
}

#[tokio::test]
async fn replaced_context_reaches_executor() {
    let orm = Orm::with_config(OrmConfig::new().interceptor(Redirect));
    let exec = MockExecutor::new().with_rows(
        &["id", "name"],
        vec![vec![Value::Int(5), Value::from("old")]],
    );

    let user = orm
        .select::<User>()
        .where_(col("id").eq(5))
        .get(&exec)
        .await
        .unwrap();
    assert_eq!(user, User::new(5, "old"));
    assert_eq!(exec.statements()[0].0, "SELECT id, name FROM user_archive;");
    assert!(exec.statements()[0].1.is_empty());
}

#[tokio::test]
async fn abort_propagates_to_caller() {
    let orm = Orm::with_config(OrmConfig::new().interceptor(DenyUpdates));
    let exec = MockExecutor::new();

    let err = orm
        .update::<User>()
        .set([assign("name", "x")])
        .exec(&exec)
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::Aborted(_)));
    assert!(exec.statements().is_empty());

    let user = User::new(1, "a");
    orm.insert::<User>().values([&user]).exec(&exec).await.unwrap();
    assert_eq!(exec.statements().len(), 1);
}

#[tokio::test]
async fn query_log_sink_sees_rendered_statements() {
    let seen: Arc<Mutex<Vec<(StatementKind, String, usize)>>> = Arc::default();
    let sink_seen = seen.clone();
    let log = QueryLog::new().sink(move |kind, query| {
        sink_seen
            .lock()
            .unwrap()
            .push((kind, query.sql().to_string(), query.args().len()));
    });
    let orm = Orm::with_config(OrmConfig::new().interceptor(log));
    let exec = MockExecutor::new().with_rows(&["id"], vec![]);

    orm.select::<User>()
        .where_(col("id").eq(1))
        .get_multi(&exec)
        .await
        .unwrap();
    let user = User::new(1, "a");
    orm.insert::<User>().values([&user]).exec(&exec).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        [
            (
                StatementKind::Select,
                "SELECT * FROM `user` WHERE `id` = ?;".to_string(),
                1
            ),
            (
                StatementKind::Insert,
                "INSERT INTO `user`(`id`,`name`) VALUES(?,?);".to_string(),
                2
            ),
        ]
    );
}

#[tokio::test]
async fn query_log_returns_render_errors() {
    let calls = Arc::new(Mutex::new(0));
    let sink_calls = calls.clone();
    let log = QueryLog::new().sink(move |_, _| *sink_calls.lock().unwrap() += 1);
    let orm = Orm::with_config(OrmConfig::new().interceptor(log));
    let exec = MockExecutor::new();

    let err = orm.insert::<User>().exec(&exec).await.unwrap_err();
    assert!(matches!(err, OrmError::ZeroRowInsert));
    assert_eq!(*calls.lock().unwrap(), 0);
    assert!(exec.statements().is_empty());
}

#[tokio::test]
async fn query_log_emits_tracing_events() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let orm = Orm::with_config(
        OrmConfig::new().interceptor(QueryLog::new().level(tracing::Level::INFO).max_sql_length(10)),
    );
    let exec = MockExecutor::new().with_rows(&["id"], vec![]);
    let users = orm.select::<User>().get_multi(&exec).await.unwrap();
    assert!(users.is_empty());
}

#[test]
fn statement_kind_display() {
    assert_eq!(StatementKind::Select.to_string(), "select");
    assert_eq!(StatementKind::Raw.as_str(), "raw");
}
