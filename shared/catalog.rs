//! Route catalog of the nile-auth HTTP surface.
//!
//! This is the endpoint source both published documents are assembled from.
//! The v2 document is the same catalog restricted to `/v2/` routes.

use crate::document::{HttpMethod, Operation};
use crate::endpoints::{EndpointDescriptor, StaticEndpoints};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Prefix shared by every auth route
pub const AUTH_BASE: &str = "/v2/databases/{database}/auth";

/// Route whose presence proves the catalog was consulted
pub const MFA_PATH: &str = "/v2/databases/{database}/auth/mfa";

/// Descriptions for the tags used by catalog operations
pub fn tag_descriptions() -> BTreeMap<String, String> {
    [
        ("auth", "Sign in, sign out, sessions and provider callbacks"),
        ("mfa", "Multi-factor authentication enrollment and challenges"),
        ("users", "User sign up and profile management"),
        ("tenants", "Tenants and tenant membership"),
        ("docs", "API documentation"),
    ]
    .into_iter()
    .map(|(name, description)| (name.to_string(), description.to_string()))
    .collect()
}

/// Every documented nile-auth route
pub fn nile_auth_endpoints() -> StaticEndpoints {
    let mut descriptors = Vec::new();
    descriptors.extend(auth_endpoints());
    descriptors.extend(mfa_endpoints());
    descriptors.extend(user_endpoints());
    descriptors.extend(tenant_endpoints());
    descriptors.extend(docs_endpoints());
    StaticEndpoints::new(descriptors)
}

fn auth_path(suffix: &str) -> String {
    format!("{AUTH_BASE}/{suffix}")
}

fn database_op(summary: &str, id: &str, tag: &str) -> Operation {
    Operation::new(summary)
        .operation_id(id)
        .tag(tag)
        .path_param("database", "Name of the Nile database")
}

fn error_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "error": { "type": "string" },
            "message": { "type": "string" }
        }
    })
}

fn user_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string", "format": "uuid" },
            "email": { "type": "string", "format": "email" },
            "name": { "type": "string" },
            "emailVerified": { "type": "string", "format": "date-time", "nullable": true },
            "multiFactor": { "type": "boolean" }
        }
    })
}

fn tenant_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string", "format": "uuid" },
            "name": { "type": "string" }
        }
    })
}

fn credentials_schema() -> Value {
    json!({
        "type": "object",
        "required": ["email", "password"],
        "properties": {
            "email": { "type": "string", "format": "email" },
            "password": { "type": "string", "format": "password" },
            "csrfToken": { "type": "string" },
            "callbackUrl": { "type": "string" }
        }
    })
}

fn auth_endpoints() -> Vec<EndpointDescriptor> {
    vec![
        EndpointDescriptor::new(
            HttpMethod::Get,
            auth_path("providers"),
            database_op("List sign-in providers", "listProviders", "auth").json_response(
                "200",
                "Configured providers keyed by id",
                json!({ "type": "object", "additionalProperties": { "type": "object" } }),
            ),
        ),
        EndpointDescriptor::new(
            HttpMethod::Get,
            auth_path("csrf"),
            database_op("Issue a CSRF token", "getCsrfToken", "auth").json_response(
                "200",
                "CSRF token",
                json!({ "type": "object", "properties": { "csrfToken": { "type": "string" } } }),
            ),
        ),
        EndpointDescriptor::new(
            HttpMethod::Get,
            auth_path("session"),
            database_op("Read the current session", "getSession", "auth").json_response(
                "200",
                "Active session, or an empty object when signed out",
                json!({
                    "type": "object",
                    "properties": {
                        "user": user_schema(),
                        "expires": { "type": "string", "format": "date-time" }
                    }
                }),
            ),
        ),
        EndpointDescriptor::new(
            HttpMethod::Post,
            auth_path("signin/{provider}"),
            database_op("Sign in with a provider", "signIn", "auth")
                .path_param("provider", "Provider id such as credentials or google")
                .body("application/x-www-form-urlencoded", credentials_schema())
                .response("302", "Redirect to the callback or error page")
                .json_response("401", "Invalid credentials", error_schema()),
        ),
        EndpointDescriptor::new(
            HttpMethod::Get,
            auth_path("callback/{provider}"),
            database_op("Provider callback", "providerCallbackGet", "auth")
                .path_param("provider", "Provider id")
                .query_param("code", "Authorization code returned by the provider")
                .query_param("state", "Opaque state echoed by the provider")
                .response("302", "Session established, redirect to callback URL"),
        ),
        EndpointDescriptor::new(
            HttpMethod::Post,
            auth_path("callback/{provider}"),
            database_op("Credentials callback", "providerCallbackPost", "auth")
                .path_param("provider", "Provider id")
                .body("application/x-www-form-urlencoded", credentials_schema())
                .response("302", "Session established, redirect to callback URL")
                .json_response("401", "Invalid credentials", error_schema()),
        ),
        EndpointDescriptor::new(
            HttpMethod::Post,
            auth_path("signout"),
            database_op("Sign out", "signOut", "auth")
                .response("200", "Session cookie cleared"),
        ),
        EndpointDescriptor::new(
            HttpMethod::Get,
            auth_path("error"),
            database_op("Authentication error page", "authError", "auth")
                .query_param("error", "Error code")
                .response("200", "Error details"),
        ),
        EndpointDescriptor::new(
            HttpMethod::Get,
            auth_path("verify-request"),
            database_op("Verify an email sign-in link", "verifyRequest", "auth")
                .query_param("token", "Verification token")
                .response("302", "Redirect after verification"),
        ),
        EndpointDescriptor::new(
            HttpMethod::Post,
            auth_path("reset-password"),
            database_op("Request a password reset email", "requestPasswordReset", "auth")
                .body(
                    "application/json",
                    json!({
                        "type": "object",
                        "required": ["email"],
                        "properties": { "email": { "type": "string", "format": "email" } }
                    }),
                )
                .response("200", "Reset email sent"),
        ),
        EndpointDescriptor::new(
            HttpMethod::Put,
            auth_path("reset-password"),
            database_op("Set a new password", "resetPassword", "auth")
                .body(
                    "application/json",
                    json!({
                        "type": "object",
                        "required": ["token", "password"],
                        "properties": {
                            "token": { "type": "string" },
                            "password": { "type": "string", "format": "password" }
                        }
                    }),
                )
                .response("204", "Password updated")
                .json_response("400", "Invalid or expired token", error_schema()),
        ),
        EndpointDescriptor::new(
            HttpMethod::Post,
            auth_path("verify-email"),
            database_op("Send an email verification link", "verifyEmail", "auth")
                .response("200", "Verification email sent")
                .json_response("401", "Not signed in", error_schema()),
        ),
    ]
}

fn mfa_endpoints() -> Vec<EndpointDescriptor> {
    let challenge = json!({
        "type": "object",
        "properties": {
            "token": { "type": "string" },
            "method": { "type": "string", "enum": ["authenticator", "email"] },
            "otpauthUrl": { "type": "string" },
            "recoveryKeys": { "type": "array", "items": { "type": "string" } }
        }
    });

    vec![
        EndpointDescriptor::new(
            HttpMethod::Post,
            MFA_PATH,
            database_op("Start multi-factor enrollment", "setupMfa", "mfa")
                .body(
                    "application/json",
                    json!({
                        "type": "object",
                        "properties": {
                            "method": { "type": "string", "enum": ["authenticator", "email"] }
                        }
                    }),
                )
                .json_response("200", "Enrollment challenge", challenge)
                .json_response("401", "Not signed in", error_schema()),
        ),
        EndpointDescriptor::new(
            HttpMethod::Put,
            MFA_PATH,
            database_op("Verify a multi-factor challenge", "verifyMfa", "mfa")
                .body(
                    "application/json",
                    json!({
                        "type": "object",
                        "required": ["token", "code"],
                        "properties": {
                            "token": { "type": "string" },
                            "code": { "type": "string" },
                            "scope": { "type": "string", "enum": ["setup", "challenge"] }
                        }
                    }),
                )
                .response("200", "Challenge accepted")
                .json_response("400", "Invalid code", error_schema()),
        ),
        EndpointDescriptor::new(
            HttpMethod::Delete,
            MFA_PATH,
            database_op("Disable multi-factor authentication", "disableMfa", "mfa")
                .description("Removes every enrolled factor for the signed-in user.")
                .response("204", "Multi-factor authentication disabled")
                .json_response("401", "Not signed in", error_schema()),
        ),
    ]
}

fn user_endpoints() -> Vec<EndpointDescriptor> {
    let me = "/v2/databases/{database}/me";
    vec![
        EndpointDescriptor::new(
            HttpMethod::Post,
            "/v2/databases/{database}/users",
            database_op("Sign up", "createUser", "users")
                .query_param("tenantId", "Tenant to add the new user to")
                .body("application/json", credentials_schema())
                .json_response("201", "User created", user_schema())
                .json_response("400", "Invalid request", error_schema()),
        ),
        EndpointDescriptor::new(
            HttpMethod::Get,
            me,
            database_op("Current user", "me", "users")
                .json_response("200", "Signed-in user", user_schema())
                .json_response("401", "Not signed in", error_schema()),
        ),
        EndpointDescriptor::new(
            HttpMethod::Put,
            me,
            database_op("Update current user", "updateMe", "users")
                .body("application/json", user_schema())
                .json_response("200", "Updated user", user_schema()),
        ),
        EndpointDescriptor::new(
            HttpMethod::Delete,
            me,
            database_op("Delete current user", "deleteMe", "users")
                .response("204", "User removed"),
        ),
    ]
}

fn tenant_endpoints() -> Vec<EndpointDescriptor> {
    let tenants = "/v2/databases/{database}/tenants";
    let tenant = "/v2/databases/{database}/tenants/{tenantId}";
    let members = "/v2/databases/{database}/tenants/{tenantId}/users";
    let member = "/v2/databases/{database}/tenants/{tenantId}/users/{userId}";

    let tenant_op = |summary: &str, id: &str| {
        database_op(summary, id, "tenants").path_param("tenantId", "Tenant identifier")
    };

    vec![
        EndpointDescriptor::new(
            HttpMethod::Get,
            tenants,
            database_op("List tenants of the current user", "listTenants", "tenants")
                .json_response(
                    "200",
                    "Tenants",
                    json!({ "type": "array", "items": tenant_schema() }),
                ),
        ),
        EndpointDescriptor::new(
            HttpMethod::Post,
            tenants,
            database_op("Create a tenant", "createTenant", "tenants")
                .body("application/json", tenant_schema())
                .json_response("201", "Tenant created", tenant_schema()),
        ),
        EndpointDescriptor::new(
            HttpMethod::Get,
            tenant,
            tenant_op("Get a tenant", "getTenant")
                .json_response("200", "Tenant", tenant_schema())
                .json_response("404", "Tenant not found", error_schema()),
        ),
        EndpointDescriptor::new(
            HttpMethod::Put,
            tenant,
            tenant_op("Rename a tenant", "updateTenant")
                .body("application/json", tenant_schema())
                .json_response("200", "Tenant", tenant_schema()),
        ),
        EndpointDescriptor::new(
            HttpMethod::Delete,
            tenant,
            tenant_op("Delete a tenant", "deleteTenant").response("204", "Tenant deleted"),
        ),
        EndpointDescriptor::new(
            HttpMethod::Get,
            members,
            tenant_op("List tenant members", "listTenantUsers").json_response(
                "200",
                "Members",
                json!({ "type": "array", "items": user_schema() }),
            ),
        ),
        EndpointDescriptor::new(
            HttpMethod::Post,
            members,
            tenant_op("Add a user to a tenant", "createTenantUser")
                .body("application/json", credentials_schema())
                .json_response("201", "Member added", user_schema()),
        ),
        EndpointDescriptor::new(
            HttpMethod::Put,
            member,
            tenant_op("Link an existing user to a tenant", "linkTenantUser")
                .path_param("userId", "User identifier")
                .response("201", "User linked"),
        ),
        EndpointDescriptor::new(
            HttpMethod::Delete,
            member,
            tenant_op("Remove a user from a tenant", "unlinkTenantUser")
                .path_param("userId", "User identifier")
                .response("204", "User removed from tenant"),
        ),
    ]
}

fn docs_endpoints() -> Vec<EndpointDescriptor> {
    let document = json!({ "type": "object", "description": "OpenAPI 3.0 document" });
    vec![
        EndpointDescriptor::new(
            HttpMethod::Get,
            "/swagger/spec",
            Operation::new("OpenAPI document as JSON")
                .operation_id("getSwaggerSpec")
                .tag("docs")
                .json_response("200", "OpenAPI document", document.clone()),
        ),
        EndpointDescriptor::new(
            HttpMethod::Get,
            "/v2/openapi",
            Operation::new("Download the OpenAPI document as YAML")
                .operation_id("downloadOpenApi")
                .tag("docs")
                .response("200", "nile-auth.yaml attachment"),
        ),
        EndpointDescriptor::new(
            HttpMethod::Get,
            "/v2/swagger/spec",
            Operation::new("v2 OpenAPI document as JSON")
                .operation_id("getV2SwaggerSpec")
                .tag("docs")
                .json_response("200", "OpenAPI document", document),
        ),
        EndpointDescriptor::new(
            HttpMethod::Get,
            "/health",
            Operation::new("Documentation service health")
                .operation_id("health")
                .tag("docs")
                .response("200", "Healthy")
                .response("503", "A document failed to build"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::EndpointSource;
    use std::collections::HashSet;

    #[test]
    fn catalog_contains_mfa_delete() {
        let endpoints = nile_auth_endpoints().endpoints().unwrap();
        assert!(endpoints
            .iter()
            .any(|d| d.path == MFA_PATH && d.method == HttpMethod::Delete));
    }

    #[test]
    fn operation_ids_are_unique() {
        let endpoints = nile_auth_endpoints().endpoints().unwrap();
        let mut seen = HashSet::new();
        for descriptor in &endpoints {
            let id = descriptor.operation.operation_id.clone().unwrap();
            assert!(seen.insert(id.clone()), "duplicate operationId {}", id);
        }
    }

    #[test]
    fn every_tag_has_a_description() {
        let descriptions = tag_descriptions();
        for descriptor in nile_auth_endpoints().endpoints().unwrap() {
            for tag in &descriptor.operation.tags {
                assert!(descriptions.contains_key(tag), "undescribed tag {}", tag);
            }
        }
    }
}
