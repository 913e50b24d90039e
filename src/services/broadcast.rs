use std::future::Future;

/// Result of a best-effort fan-out: every target is attempted, one
/// failure never aborts the batch.
#[derive(Debug, Default)]
pub struct BroadcastOutcome {
    pub success_count: usize,
    pub failures: Vec<(i64, String)>,
}

impl BroadcastOutcome {
    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_failure(&mut self, target_id: i64, error: String) {
        self.failures.push((target_id, error));
    }

    pub fn total(&self) -> usize {
        self.success_count + self.failures.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "Рассылка завершена. Успешно отправлено: {} из {} пользователей.",
            self.success_count,
            self.total()
        )
    }
}

pub async fn broadcast_to_users<F, Fut, E>(targets: &[i64], mut send: F) -> BroadcastOutcome
where
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let mut outcome = BroadcastOutcome::default();

    for &target_id in targets {
        match send(target_id).await {
            Ok(()) => outcome.record_success(),
            Err(e) => {
                tracing::error!("Failed to send to user {}: {}", target_id, e);
                outcome.record_failure(target_id, e.to_string());
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn one_failure_does_not_abort_the_batch() {
        let targets = [1, 2, 3];

        let outcome = broadcast_to_users(&targets, |target_id| async move {
            if target_id == 2 {
                Err("chat not found".to_string())
            } else {
                Ok(())
            }
        })
        .await;

        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.total(), 3);
        assert_eq!(outcome.failures, vec![(2, "chat not found".to_string())]);
        assert_eq!(
            outcome.summary(),
            "Рассылка завершена. Успешно отправлено: 2 из 3 пользователей."
        );
    }

    #[tokio::test]
    async fn empty_target_list_reports_zero_of_zero() {
        let outcome =
            broadcast_to_users(&[], |_| async move { Ok::<(), String>(()) }).await;

        assert_eq!(outcome.success_count, 0);
        assert!(outcome.failures.is_empty());
        assert_eq!(
            outcome.summary(),
            "Рассылка завершена. Успешно отправлено: 0 из 0 пользователей."
        );
    }
}
