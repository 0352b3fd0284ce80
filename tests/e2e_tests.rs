//! End-to-end integration tests
//!
//! These tests run complete husband/wife ledgers through the controller and
//! the text reporter using the fixtures in tests/fixtures/. Each fixture holds:
//! - husband.txt and wife.txt, the two ledgers
//! - expected.txt, the report for the given opening balance
//!
//! The two ledgers run concurrently, so only the first and last lines of the
//! report have a fixed position. The fixtures are chosen so that every event
//! line is the same under any interleaving; the middle of the report is
//! compared as a multiset, and each actor's lines must keep their file order.
//!
//! Each test is run twice: once on OS threads and once on tokio tasks.

#[cfg(test)]
mod tests {
    use joint_bank::cli::StrategyType;
    use joint_bank::core::{ConcurrencyController, EventSink, NullSink, Pipeline};
    use joint_bank::io::{LedgerSource, Reporter};
    use joint_bank::strategy::create_strategy;
    use joint_bank::types::{Actor, BankError, Outcome, TransactionKind};
    use rstest::rstest;
    use std::fs;
    use std::io::{self, Write};
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn pipelines(husband: LedgerSource, wife: LedgerSource) -> Vec<Pipeline> {
        vec![
            Pipeline::new(Actor::Husband, husband),
            Pipeline::new(Actor::Wife, wife),
        ]
    }

    /// Run both ledgers with a text reporter and return the report text
    fn run_to_text(
        opening: i64,
        husband: LedgerSource,
        wife: LedgerSource,
        strategy: StrategyType,
    ) -> String {
        let buffer = SharedBuffer::default();
        let reporter = Arc::new(Reporter::text(buffer.clone()));
        let controller = ConcurrencyController::new(create_strategy(strategy, None));

        reporter.opening(opening);
        let report = controller.run(
            opening,
            pipelines(husband, wife),
            Arc::clone(&reporter) as Arc<dyn EventSink>,
        );
        reporter.closing(report.closing_balance);
        reporter.finish().expect("report written");

        assert!(report.is_success(), "failures: {:?}", report.failures);
        assert_eq!(report.audit(), Ok(()));
        buffer.contents()
    }

    fn lines_for<'a>(lines: &[&'a str], actor: &str) -> Vec<&'a str> {
        let tag = format!("User: {},", actor);
        lines
            .iter()
            .copied()
            .filter(|line| line.contains(&tag))
            .collect()
    }

    /// Run a fixture directory and compare the report with expected.txt
    fn run_test_fixture(fixture_name: &str, opening: i64, strategy_type: StrategyType) {
        let fixture_dir = Path::new("tests/fixtures").join(fixture_name);
        let husband = LedgerSource::open(&fixture_dir.join("husband.txt"))
            .unwrap_or_else(|e| panic!("{}", e));
        let wife =
            LedgerSource::open(&fixture_dir.join("wife.txt")).unwrap_or_else(|e| panic!("{}", e));
        let expected_path = fixture_dir.join("expected.txt");
        let expected_output = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
            panic!("Failed to read expected file {}: {}", expected_path.display(), e)
        });

        let actual_output = run_to_text(opening, husband, wife, strategy_type.clone());

        let actual: Vec<&str> = actual_output.lines().collect();
        let expected: Vec<&str> = expected_output.lines().collect();
        let context = format!(
            "\n\nfixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );

        assert_eq!(actual.len(), expected.len(), "{}", context);
        assert_eq!(actual.first(), expected.first(), "{}", context);
        assert_eq!(actual.last(), expected.last(), "{}", context);

        let mut actual_middle = actual[1..actual.len() - 1].to_vec();
        let mut expected_middle = expected[1..expected.len() - 1].to_vec();
        actual_middle.sort_unstable();
        expected_middle.sort_unstable();
        assert_eq!(actual_middle, expected_middle, "{}", context);

        for actor in ["Husband", "Wife"] {
            assert_eq!(
                lines_for(&actual, actor),
                lines_for(&expected, actor),
                "{} lines out of file order{}",
                actor,
                context
            );
        }
    }

    /// End-to-end test for all fixtures with both strategies
    #[rstest]
    #[case("scenario_mixed", 100)]
    #[case("empty_account", 0)]
    #[case("malformed_lines", 20)]
    #[case("whitespace_and_case", 0)]
    #[case("negative_amounts", 10)]
    fn test_fixtures(
        #[case] fixture: &str,
        #[case] opening: i64,
        #[values(StrategyType::Threads, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, opening, strategy);
    }

    #[rstest]
    fn test_concurrent_deposits_are_not_lost(
        #[values(StrategyType::Threads, StrategyType::Async)] strategy: StrategyType,
    ) {
        let output = run_to_text(
            50,
            LedgerSource::text("deposit 10\n"),
            LedgerSource::text("deposit 20\n"),
            strategy,
        );
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Opening balance: 50");
        assert_eq!(lines[3], "Closing balance: 80");
        // Whichever deposit ran second saw the other one
        assert!(lines[1..3]
            .iter()
            .any(|line| line.ends_with("Account balance after: 80")));
    }

    #[rstest]
    fn test_only_one_competing_withdrawal_succeeds(
        #[values(StrategyType::Threads, StrategyType::Async)] strategy: StrategyType,
    ) {
        let controller = ConcurrencyController::new(create_strategy(strategy, None));
        let report = controller.run(
            100,
            pipelines(
                LedgerSource::text("withdraw 70\n"),
                LedgerSource::text("withdraw 70\n"),
            ),
            Arc::new(NullSink),
        );

        assert_eq!(report.closing_balance, 30);
        let applied = report.events.iter().filter(|e| e.is_applied()).count();
        let declined = report
            .events
            .iter()
            .filter(|e| e.outcome == Outcome::Declined)
            .count();
        assert_eq!((applied, declined), (1, 1));
    }

    #[rstest]
    fn test_negative_opening_balance_declines_every_withdrawal(
        #[values(StrategyType::Threads, StrategyType::Async)] strategy: StrategyType,
    ) {
        let controller = ConcurrencyController::new(create_strategy(strategy, None));
        let report = controller.run(
            -5,
            pipelines(
                LedgerSource::text("withdraw 1\nwithdraw 0\n"),
                LedgerSource::text("withdraw -3\n"),
            ),
            Arc::new(NullSink),
        );

        assert!(report.is_success());
        assert_eq!(report.closing_balance, -5);
        assert_eq!(report.events.len(), 3);
        assert!(report
            .events
            .iter()
            .all(|e| e.outcome == Outcome::Declined && e.balance_after == -5));
        assert_eq!(report.audit(), Ok(()));
    }

    /// Deterministic mixed ledger with enough lines to interleave heavily
    fn stress_ledger(seed: i64, lines: usize) -> String {
        (0..lines)
            .map(|i| {
                let amount = (i as i64 * 37 + seed * 11) % 90 + 1;
                if (i as i64 + seed) % 3 == 0 {
                    format!("deposit {}\n", amount)
                } else {
                    format!("withdraw {}\n", amount)
                }
            })
            .collect()
    }

    #[rstest]
    fn test_stress_run_is_serializable(
        #[values(StrategyType::Threads, StrategyType::Async)] strategy: StrategyType,
    ) {
        const LINES: usize = 2_000;
        let opening = 500;
        let controller = ConcurrencyController::new(create_strategy(strategy, None));
        let report = controller.run(
            opening,
            pipelines(
                LedgerSource::text(stress_ledger(1, LINES)),
                LedgerSource::text(stress_ledger(2, LINES)),
            ),
            Arc::new(NullSink),
        );

        assert!(report.is_success());
        assert_eq!(report.events.len(), 2 * LINES);
        assert_eq!(report.audit(), Ok(()));

        // Conservation: closing = opening + applied deposits - applied withdrawals
        let net: i64 = report
            .events
            .iter()
            .filter(|e| e.is_applied())
            .map(|e| match e.transaction.kind {
                TransactionKind::Deposit => e.transaction.amount,
                TransactionKind::Withdraw => -e.transaction.amount,
                TransactionKind::Unknown => 0,
            })
            .sum();
        assert_eq!(report.closing_balance, opening + net);

        // No overdraft from a non-negative opening balance
        assert!(report.events.iter().all(|e| e.balance_after >= 0));

        // Each actor's transactions took effect in file order
        for actor in [Actor::Husband, Actor::Wife] {
            let lines: Vec<usize> = report
                .events_for(actor)
                .map(|e| e.transaction.line)
                .collect();
            assert_eq!(lines, (1..=LINES).collect::<Vec<_>>());
        }
    }

    #[rstest]
    fn test_invalid_utf8_fails_one_pipeline(
        #[values(StrategyType::Threads, StrategyType::Async)] strategy: StrategyType,
    ) {
        let mut wife_file = NamedTempFile::new().unwrap();
        wife_file.write_all(b"deposit 5\n\xff\xfe\n").unwrap();
        wife_file.flush().unwrap();

        let controller = ConcurrencyController::new(create_strategy(strategy, None));
        let report = controller.run(
            10,
            pipelines(
                LedgerSource::text("deposit 1\n"),
                LedgerSource::open(wife_file.path()).unwrap(),
            ),
            Arc::new(NullSink),
        );

        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            &report.failures[0],
            BankError::PipelineFailed {
                actor: Actor::Wife,
                ..
            }
        ));
        // Nothing from the unreadable ledger was applied
        assert_eq!(report.closing_balance, 11);
        assert_eq!(report.events_for(Actor::Wife).count(), 0);
    }

    #[test]
    fn test_missing_file_is_reported_before_running() {
        let result = LedgerSource::open(Path::new("tests/fixtures/does_not_exist.txt"));

        assert!(matches!(result, Err(BankError::FileAccess { .. })));
    }
}
