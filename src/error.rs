use thiserror::Error;

/// Failure of the one-time container fetch at startup. It is kept in the view
/// state and shown in place of the table instead of aborting the program.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not connect to the docker daemon")]
    Connection(#[source] bollard::errors::Error),
    #[error("could not list running containers")]
    Query(#[source] bollard::errors::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cause_is_not_repeated_in_message() {
        let error = FetchError::Query(bollard::errors::Error::DockerResponseServerError {
            status_code: 403,
            message: "permission denied".to_owned(),
        });
        assert_eq!(error.to_string(), "could not list running containers");
        let chain = format!("{:#}", anyhow::Error::new(error));
        assert_eq!(chain.matches("permission denied").count(), 1);
    }
}
