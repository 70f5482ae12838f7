//! Resource kinds
//!
//! The closed set of record categories the engine can emit. Each kind knows
//! its Terraform resource type and the ARM endpoint it is listed from.

use serde::Serialize;
use std::fmt;

/// Where a kind's collection lives in the ARM tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmEndpoint {
    /// Top-level collection listed under a subscription or resource group
    Provider {
        namespace: &'static str,
        resource_type: &'static str,
    },
    /// Child collection listed under its parent's id
    Child { segment: &'static str },
}

/// Resource-kind label attached to every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    ApiManagement,
    ApiManagementApi,
    ApiManagementApiDiagnostic,
    ApiManagementApiRelease,
    ApiManagementApiSchema,
    ApiManagementApiTag,
    ApiManagementBackend,
    ApiManagementGateway,
    ApiManagementGatewayApi,
    ServicebusNamespace,
    ApplicationInsights,
    StorageAccount,
    AppServicePlan,
    AppService,
}

const API_MANAGEMENT_VERSION: &str = "2021-08-01";

impl ResourceKind {
    pub const ALL: [ResourceKind; 14] = [
        ResourceKind::ApiManagement,
        ResourceKind::ApiManagementApi,
        ResourceKind::ApiManagementApiDiagnostic,
        ResourceKind::ApiManagementApiRelease,
        ResourceKind::ApiManagementApiSchema,
        ResourceKind::ApiManagementApiTag,
        ResourceKind::ApiManagementBackend,
        ResourceKind::ApiManagementGateway,
        ResourceKind::ApiManagementGatewayApi,
        ResourceKind::ServicebusNamespace,
        ResourceKind::ApplicationInsights,
        ResourceKind::StorageAccount,
        ResourceKind::AppServicePlan,
        ResourceKind::AppService,
    ];

    /// Kebab-case label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApiManagement => "api-management",
            Self::ApiManagementApi => "api-management-api",
            Self::ApiManagementApiDiagnostic => "api-management-api-diagnostic",
            Self::ApiManagementApiRelease => "api-management-api-release",
            Self::ApiManagementApiSchema => "api-management-api-schema",
            Self::ApiManagementApiTag => "api-management-api-tag",
            Self::ApiManagementBackend => "api-management-backend",
            Self::ApiManagementGateway => "api-management-gateway",
            Self::ApiManagementGatewayApi => "api-management-gateway-api",
            Self::ServicebusNamespace => "servicebus-namespace",
            Self::ApplicationInsights => "application-insights",
            Self::StorageAccount => "storage-account",
            Self::AppServicePlan => "app-service-plan",
            Self::AppService => "app-service",
        }
    }

    /// Terraform azurerm resource type the record is imported as
    pub fn terraform_type(self) -> &'static str {
        match self {
            Self::ApiManagement => "azurerm_api_management",
            Self::ApiManagementApi => "azurerm_api_management_api",
            Self::ApiManagementApiDiagnostic => "azurerm_api_management_api_diagnostic",
            Self::ApiManagementApiRelease => "azurerm_api_management_api_release",
            Self::ApiManagementApiSchema => "azurerm_api_management_api_schema",
            Self::ApiManagementApiTag => "azurerm_api_management_api_tag",
            Self::ApiManagementBackend => "azurerm_api_management_backend",
            Self::ApiManagementGateway => "azurerm_api_management_gateway",
            Self::ApiManagementGatewayApi => "azurerm_api_management_gateway_api",
            Self::ServicebusNamespace => "azurerm_servicebus_namespace",
            Self::ApplicationInsights => "azurerm_application_insights",
            Self::StorageAccount => "azurerm_storage_account",
            Self::AppServicePlan => "azurerm_app_service_plan",
            Self::AppService => "azurerm_app_service",
        }
    }

    pub fn endpoint(self) -> ArmEndpoint {
        let provider = |namespace, resource_type| ArmEndpoint::Provider {
            namespace,
            resource_type,
        };
        let child = |segment| ArmEndpoint::Child { segment };

        match self {
            Self::ApiManagement => provider("Microsoft.ApiManagement", "service"),
            Self::ApiManagementApi => child("apis"),
            Self::ApiManagementApiDiagnostic => child("diagnostics"),
            Self::ApiManagementApiRelease => child("releases"),
            Self::ApiManagementApiSchema => child("schemas"),
            Self::ApiManagementApiTag => child("tagDescriptions"),
            Self::ApiManagementBackend => child("backends"),
            Self::ApiManagementGateway => child("gateways"),
            Self::ApiManagementGatewayApi => child("apis"),
            Self::ServicebusNamespace => provider("Microsoft.ServiceBus", "namespaces"),
            Self::ApplicationInsights => provider("Microsoft.Insights", "components"),
            Self::StorageAccount => provider("Microsoft.Storage", "storageAccounts"),
            Self::AppServicePlan => provider("Microsoft.Web", "serverfarms"),
            Self::AppService => provider("Microsoft.Web", "sites"),
        }
    }

    /// ARM api-version used when listing this kind
    pub fn api_version(self) -> &'static str {
        match self {
            Self::ApiManagement
            | Self::ApiManagementApi
            | Self::ApiManagementApiDiagnostic
            | Self::ApiManagementApiRelease
            | Self::ApiManagementApiSchema
            | Self::ApiManagementApiTag
            | Self::ApiManagementBackend
            | Self::ApiManagementGateway
            | Self::ApiManagementGatewayApi => API_MANAGEMENT_VERSION,
            Self::ServicebusNamespace => "2021-11-01",
            Self::ApplicationInsights => "2020-02-02",
            Self::StorageAccount => "2019-04-01",
            Self::AppServicePlan | Self::AppService => "2021-03-01",
        }
    }

    pub fn is_top_level(self) -> bool {
        matches!(self.endpoint(), ArmEndpoint::Provider { .. })
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
