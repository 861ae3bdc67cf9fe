use bollard::{
    container::ListContainersOptions,
    service::{ContainerSummary, Port, PortTypeEnum},
    Docker,
};
use tracing::{debug, info, warn};

use crate::error::FetchError;

/// Number of characters of the container ID that are shown.
pub const SHORT_ID_LEN: usize = 12;

/// One line of the container table. Built once from the daemon's answer and
/// never changed afterwards.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ContainerRow {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: String,
    pub ports: String,
}

impl ContainerRow {
    /// Cell values in column order.
    pub fn cells(&self) -> [&str; 5] {
        [&self.id, &self.name, &self.image, &self.status, &self.ports]
    }
}

impl From<ContainerSummary> for ContainerRow {
    fn from(value: ContainerSummary) -> Self {
        let id = value.id.unwrap_or_default();
        let name = value
            .names
            .and_then(|names| names.into_iter().next())
            .unwrap_or_default();

        Self {
            id: id.chars().take(SHORT_ID_LEN).collect(),
            name: match name.strip_prefix('/') {
                Some(stripped) => stripped.to_owned(),
                None => name,
            },
            image: value.image.unwrap_or_default(),
            status: value.status.unwrap_or_default(),
            ports: value
                .ports
                .unwrap_or_default()
                .iter()
                .map(format_port)
                .collect(),
        }
    }
}

/// `<host-ip>:<host-port>-><container-port>/<protocol> `, trailing space
/// included so that mappings can simply be concatenated.
fn format_port(port: &Port) -> String {
    let protocol = match port.typ {
        Some(PortTypeEnum::TCP) => "tcp",
        Some(PortTypeEnum::UDP) => "udp",
        Some(PortTypeEnum::SCTP) => "sctp",
        Some(PortTypeEnum::EMPTY) | None => "",
    };
    format!(
        "{}:{}->{}/{} ",
        port.ip.as_deref().unwrap_or_default(),
        port.public_port.unwrap_or_default(),
        port.private_port,
        protocol
    )
}

/// Connect to the daemon configured by the environment (`DOCKER_HOST` and
/// friends) and fetch the containers that are currently running.
pub async fn get_running_containers() -> Result<Vec<ContainerRow>, FetchError> {
    debug!("connecting to docker using environment defaults");
    let docker = Docker::connect_with_defaults().map_err(|e| {
        warn!("failed to create docker client: {e}");
        FetchError::Connection(e)
    })?;

    list_running(&docker).await
}

#[tracing::instrument(skip(docker))]
async fn list_running(docker: &Docker) -> Result<Vec<ContainerRow>, FetchError> {
    let options = Some(ListContainersOptions::<String> {
        all: false,
        ..Default::default()
    });

    let containers = docker.list_containers(options).await.map_err(|e| {
        warn!("failed to list containers: {e}");
        FetchError::Query(e)
    })?;
    info!(count = containers.len(), "fetched running containers");

    Ok(containers.into_iter().map(ContainerRow::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, name: &str) -> ContainerSummary {
        ContainerSummary {
            id: Some(id.to_owned()),
            names: Some(vec![name.to_owned()]),
            image: Some("nginx:1.25".to_owned()),
            status: Some("Up 3 hours".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn id_is_cut_to_twelve_characters() {
        let row = ContainerRow::from(summary(
            "4f66ad9a0b2e9c3d5e1a7b8c9d0e1f2a3b4c5d6e7f8091a2b3c4d5e6f7a8b9c0",
            "/web",
        ));
        assert_eq!(row.id, "4f66ad9a0b2e");
    }

    #[test]
    fn short_id_is_kept_whole() {
        let row = ContainerRow::from(summary("abc123", "/web"));
        assert_eq!(row.id, "abc123");
    }

    #[test]
    fn exactly_one_leading_slash_is_stripped() {
        assert_eq!(ContainerRow::from(summary("a", "/web")).name, "web");
        assert_eq!(ContainerRow::from(summary("a", "//web")).name, "/web");
        assert_eq!(ContainerRow::from(summary("a", "web")).name, "web");
        assert_eq!(ContainerRow::from(summary("a", "")).name, "");
    }

    #[test]
    fn first_name_is_used() {
        let mut container = summary("a", "/first");
        container.names = Some(vec!["/first".to_owned(), "/second".to_owned()]);
        assert_eq!(ContainerRow::from(container).name, "first");
    }

    #[test]
    fn image_and_status_are_copied_verbatim() {
        let row = ContainerRow::from(summary("a", "/web"));
        assert_eq!(row.image, "nginx:1.25");
        assert_eq!(row.status, "Up 3 hours");
    }

    #[test]
    fn missing_fields_become_empty() {
        let row = ContainerRow::from(ContainerSummary::default());
        assert_eq!(row, ContainerRow::default());
    }

    #[test]
    fn no_ports_give_empty_string() {
        let mut container = summary("a", "/web");
        container.ports = Some(vec![]);
        assert_eq!(ContainerRow::from(container).ports, "");
    }

    #[test]
    fn single_port_mapping_keeps_trailing_space() {
        let mut container = summary("a", "/web");
        container.ports = Some(vec![Port {
            ip: Some("0.0.0.0".to_owned()),
            private_port: 80,
            public_port: Some(8080),
            typ: Some(PortTypeEnum::TCP),
        }]);
        assert_eq!(ContainerRow::from(container).ports, "0.0.0.0:8080->80/tcp ");
    }

    #[test]
    fn port_mappings_keep_daemon_order() {
        let mut container = summary("a", "/dns");
        container.ports = Some(vec![
            Port {
                ip: Some("127.0.0.1".to_owned()),
                private_port: 53,
                public_port: Some(5353),
                typ: Some(PortTypeEnum::UDP),
            },
            Port {
                ip: None,
                private_port: 9000,
                public_port: None,
                typ: Some(PortTypeEnum::TCP),
            },
        ]);
        assert_eq!(
            ContainerRow::from(container).ports,
            "127.0.0.1:5353->53/udp :0->9000/tcp "
        );
    }

    // The only test touching DOCKER_HOST, so the steps run in sequence.
    #[tokio::test]
    async fn fetch_failures_are_classified() {
        std::env::remove_var("DOCKER_TLS_VERIFY");

        std::env::set_var("DOCKER_HOST", "bogus://nowhere");
        let result = get_running_containers().await;
        assert!(matches!(result, Err(FetchError::Connection(_))), "{result:?}");

        // Nothing listens on port 1, so the client builds but the call fails.
        std::env::set_var("DOCKER_HOST", "tcp://127.0.0.1:1");
        let result = get_running_containers().await;
        assert!(matches!(result, Err(FetchError::Query(_))), "{result:?}");

        std::env::remove_var("DOCKER_HOST");
    }
}
