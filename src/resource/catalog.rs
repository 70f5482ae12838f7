//! Service catalog
//!
//! Enumerator trees for each discoverable service. Adding a child collection
//! means adding a kind and hooking it in here; the walker does not change.

use super::enumerator::Enumerator;
use super::kind::ResourceKind;
use anyhow::Result;

/// Selectable service names, in default discovery order
pub const SERVICE_NAMES: &[&str] = &[
    "api_management",
    "servicebus",
    "application_insights",
    "storage_account",
    "app_service",
];

/// API Management: service → apis (with their sub-collections), backends,
/// gateways (with their API bindings)
pub fn api_management() -> Enumerator {
    let api = Enumerator::new(ResourceKind::ApiManagementApi).with_children([
        Enumerator::new(ResourceKind::ApiManagementApiDiagnostic),
        Enumerator::new(ResourceKind::ApiManagementApiRelease),
        Enumerator::new(ResourceKind::ApiManagementApiSchema),
        Enumerator::new(ResourceKind::ApiManagementApiTag),
    ]);

    let gateway = Enumerator::new(ResourceKind::ApiManagementGateway)
        .with_child(Enumerator::new(ResourceKind::ApiManagementGatewayApi));

    Enumerator::new(ResourceKind::ApiManagement).with_children([
        api,
        Enumerator::new(ResourceKind::ApiManagementBackend),
        gateway,
    ])
}

/// Root enumerators for one service
pub fn service_roots(name: &str) -> Option<Vec<Enumerator>> {
    let roots = match name {
        "api_management" => vec![api_management()],
        "servicebus" => vec![Enumerator::new(ResourceKind::ServicebusNamespace)],
        "application_insights" => vec![Enumerator::new(ResourceKind::ApplicationInsights)],
        "storage_account" => vec![Enumerator::new(ResourceKind::StorageAccount)],
        "app_service" => vec![
            Enumerator::new(ResourceKind::AppServicePlan),
            Enumerator::new(ResourceKind::AppService),
        ],
        _ => return None,
    };
    Some(roots)
}

/// Root enumerators for the selected services (all of them if none selected)
pub fn roots_for(services: &[String]) -> Result<Vec<Enumerator>> {
    if services.is_empty() {
        return Ok(SERVICE_NAMES
            .iter()
            .filter_map(|name| service_roots(name))
            .flatten()
            .collect());
    }

    let mut roots = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    for name in services {
        // Walking a service twice would emit every record twice
        if seen.contains(&name.as_str()) {
            tracing::debug!("Service {} selected more than once", name);
            continue;
        }
        seen.push(name);

        let Some(service) = service_roots(name) else {
            return Err(anyhow::anyhow!(
                "Unknown service: {} (expected one of {})",
                name,
                SERVICE_NAMES.join(", ")
            ));
        };
        roots.extend(service);
    }
    Ok(roots)
}
