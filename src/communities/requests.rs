//
//  wwt-api-client
//  communities/requests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Communities Requests
//!
//! Each request borrows the authenticated [`CommunitiesClient`] and sends its
//! current tokens as cookies, as a `LiveUserToken` header, or both, depending
//! on what the endpoint expects.
//!
//! | Request | Credentials | Output |
//! |---------|-------------|--------|
//! | [`CreateCommunityRequest`] | cookies | new community ID |
//! | [`DeleteCommunityRequest`] | cookies | `bool` |
//! | [`GetCommunityInfoRequest`] | cookies + header | JSON |
//! | [`GetLatestCommunityRequest`] | header | WTML folder |
//! | [`GetMyProfileRequest`] | cookies | [`MyProfile`] |
//! | [`GetProfileEntitiesRequest`] | cookies | JSON |
//! | [`IsUserRegisteredRequest`] | header | `bool` |

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::client::Client;
use crate::api::common::{DecodeError, Error, Result};
use crate::api::endpoint::{catalog, EndpointDescriptor, ResponseKind};
use crate::api::request::{ApiRequest, TransportRequest};
use crate::api::response::{parse_json, FromResponse, XmlElement};
use crate::api::validate::FieldValue;
use crate::communities::enums::EntityType;
use crate::communities::CommunitiesClient;

/// Adds the token-pair cookies.
fn with_cookies(request: TransportRequest, comm: &CommunitiesClient) -> TransportRequest {
    request
        .cookie("access_token", comm.access_token())
        .cookie("refresh_token", comm.refresh_token())
}

/// Adds the `LiveUserToken` header.
fn with_live_token(request: TransportRequest, comm: &CommunitiesClient) -> TransportRequest {
    request.header("LiveUserToken", comm.access_token())
}

fn integer(name: &str, value: &FieldValue) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| Error::InvalidRequest(format!("\"{name}\" must be an integer")))
}

/// Creates a new community owned by the current user.
///
/// The payload is a JSON object resembling:
///
/// ```json
/// {
///   "communityJson": {
///     "CategoryID": 20,
///     "ParentID": "610131",
///     "AccessTypeID": 2,
///     "IsOffensive": false,
///     "IsLink": false,
///     "CommunityType": "Community",
///     "Name": "Community name",
///     "Description": "Community description",
///     "Tags": "tag1,tag2"
///   }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CreateCommunityRequest<'a> {
    comm: &'a CommunitiesClient,
    /// The JSON payload. Required.
    pub payload: FieldValue,
}

impl<'a> CreateCommunityRequest<'a> {
    pub(crate) fn new(comm: &'a CommunitiesClient, payload: FieldValue) -> Self {
        Self { comm, payload }
    }
}

impl ApiRequest for CreateCommunityRequest<'_> {
    /// The new community's ID.
    type Output = String;

    fn descriptor(&self) -> &'static EndpointDescriptor {
        &catalog::CREATE_COMMUNITY
    }

    fn session(&self) -> &Client {
        self.comm.parent()
    }

    fn field_values(&self) -> Vec<&FieldValue> {
        vec![&self.payload]
    }

    fn make_request(&self) -> Result<TransportRequest> {
        let FieldValue::Json(payload) = &self.payload else {
            return Err(Error::InvalidRequest(
                "\"payload\" must be a JSON dictionary".to_string(),
            ));
        };

        let url = self.descriptor().url(self.comm.parent().base_url(), &[])?;
        let request = TransportRequest::new(self.descriptor().method, url).json(payload.clone());
        Ok(with_cookies(request, self.comm))
    }

    fn process_response(&self, _status: StatusCode, body: &str) -> Result<String> {
        let value: serde_json::Value = parse_json(body)?;

        match value.get("ID") {
            Some(serde_json::Value::String(id)) => Ok(id.clone()),
            Some(serde_json::Value::Number(id)) => Ok(id.to_string()),
            _ => Err(DecodeError::Unexpected(format!("no \"ID\" in response: {body}")).into()),
        }
    }
}

/// Deletes a community. Resolves to `true` if the community was deleted.
#[derive(Debug, Clone)]
pub struct DeleteCommunityRequest<'a> {
    comm: &'a CommunitiesClient,
    /// The ID of the community to delete. Required.
    pub id: FieldValue,
}

impl<'a> DeleteCommunityRequest<'a> {
    pub(crate) fn new(comm: &'a CommunitiesClient, id: FieldValue) -> Self {
        Self { comm, id }
    }
}

impl ApiRequest for DeleteCommunityRequest<'_> {
    type Output = bool;

    fn descriptor(&self) -> &'static EndpointDescriptor {
        &catalog::DELETE_COMMUNITY
    }

    fn session(&self) -> &Client {
        self.comm.parent()
    }

    fn field_values(&self) -> Vec<&FieldValue> {
        vec![&self.id]
    }

    fn make_request(&self) -> Result<TransportRequest> {
        let id = integer("id", &self.id)?.to_string();
        let url = self
            .descriptor()
            .url(self.comm.parent().base_url(), &[("id", &id)])?;
        Ok(with_cookies(
            TransportRequest::new(self.descriptor().method, url),
            self.comm,
        ))
    }
}

/// Gets information about a community, including its permissions listing.
#[derive(Debug, Clone)]
pub struct GetCommunityInfoRequest<'a> {
    comm: &'a CommunitiesClient,
    /// The ID of the community to probe. Required.
    pub id: FieldValue,
}

impl<'a> GetCommunityInfoRequest<'a> {
    pub(crate) fn new(comm: &'a CommunitiesClient, id: FieldValue) -> Self {
        Self { comm, id }
    }
}

impl ApiRequest for GetCommunityInfoRequest<'_> {
    type Output = serde_json::Value;

    fn descriptor(&self) -> &'static EndpointDescriptor {
        &catalog::GET_COMMUNITY_INFO
    }

    fn session(&self) -> &Client {
        self.comm.parent()
    }

    fn field_values(&self) -> Vec<&FieldValue> {
        vec![&self.id]
    }

    fn make_request(&self) -> Result<TransportRequest> {
        let id = integer("id", &self.id)?.to_string();
        let url = self
            .descriptor()
            .url(self.comm.parent().base_url(), &[("id", &id)])?;
        let request = with_cookies(TransportRequest::new(self.descriptor().method, url), self.comm);
        Ok(with_live_token(request, self.comm))
    }
}

/// Gets the most recently created communities, as a WTML folder with one
/// sub-folder per community.
#[derive(Debug, Clone)]
pub struct GetLatestCommunityRequest<'a> {
    comm: &'a CommunitiesClient,
}

impl<'a> GetLatestCommunityRequest<'a> {
    pub(crate) fn new(comm: &'a CommunitiesClient) -> Self {
        Self { comm }
    }
}

impl ApiRequest for GetLatestCommunityRequest<'_> {
    type Output = XmlElement;

    fn descriptor(&self) -> &'static EndpointDescriptor {
        &catalog::GET_LATEST_COMMUNITY
    }

    fn session(&self) -> &Client {
        self.comm.parent()
    }

    fn make_request(&self) -> Result<TransportRequest> {
        let url = self.descriptor().url(self.comm.parent().base_url(), &[])?;
        Ok(with_live_token(
            TransportRequest::new(self.descriptor().method, url),
            self.comm,
        ))
    }
}

/// The logged-in user's profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MyProfile {
    /// The numeric profile ID.
    pub profile_id: i64,
    /// The user's display name.
    pub profile_name: String,
    /// Free-form "about" text.
    pub about_profile: String,
    /// The user's affiliation.
    pub affiliation: String,
    /// Site-relative link to the profile photo.
    pub profile_photo_link: String,
    /// Storage quota, e.g. `5.00 GB`.
    pub total_storage: String,
    /// Storage used.
    pub used_storage: String,
    /// Storage remaining.
    pub available_storage: String,
    /// Storage used, as a percentage string.
    pub percentage_used_storage: String,
    /// Whether this is the current user's own profile.
    pub is_current_user: bool,
    /// Whether the user is subscribed to notifications.
    pub is_subscribed: bool,
    /// Fields not modeled above.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FromResponse for MyProfile {
    fn from_response(kind: ResponseKind, body: &str) -> Result<Self> {
        match kind {
            ResponseKind::Json => Ok(parse_json(body)?),
            other => Err(DecodeError::Unexpected(format!(
                "endpoint declares {other:?} responses, not Json"
            ))
            .into()),
        }
    }
}

/// Gets the logged-in user's profile.
#[derive(Debug, Clone)]
pub struct GetMyProfileRequest<'a> {
    comm: &'a CommunitiesClient,
}

impl<'a> GetMyProfileRequest<'a> {
    pub(crate) fn new(comm: &'a CommunitiesClient) -> Self {
        Self { comm }
    }
}

impl ApiRequest for GetMyProfileRequest<'_> {
    type Output = MyProfile;

    fn descriptor(&self) -> &'static EndpointDescriptor {
        &catalog::GET_MY_PROFILE
    }

    fn session(&self) -> &Client {
        self.comm.parent()
    }

    fn make_request(&self) -> Result<TransportRequest> {
        let url = self.descriptor().url(self.comm.parent().base_url(), &[])?;
        let request = TransportRequest::new(self.descriptor().method, url)
            .header("Accept", "application/json, text/plain, */*");
        Ok(with_cookies(request, self.comm))
    }
}

/// Gets the entities (communities, folders, content) associated with the
/// logged-in user's profile.
#[derive(Debug, Clone)]
pub struct GetProfileEntitiesRequest<'a> {
    comm: &'a CommunitiesClient,
    /// What kind of entity to list. Only `Community` and `Content` are
    /// accepted by the service.
    pub entity_type: EntityType,
    /// The page of results to return, starting at 1.
    pub current_page: FieldValue,
    /// How many items to return per page.
    pub page_size: FieldValue,
}

impl<'a> GetProfileEntitiesRequest<'a> {
    pub(crate) fn new(
        comm: &'a CommunitiesClient,
        entity_type: EntityType,
        current_page: FieldValue,
        page_size: FieldValue,
    ) -> Self {
        Self {
            comm,
            entity_type,
            current_page,
            page_size,
        }
    }
}

impl ApiRequest for GetProfileEntitiesRequest<'_> {
    type Output = serde_json::Value;

    fn descriptor(&self) -> &'static EndpointDescriptor {
        &catalog::GET_PROFILE_ENTITIES
    }

    fn session(&self) -> &Client {
        self.comm.parent()
    }

    fn field_values(&self) -> Vec<&FieldValue> {
        vec![&self.current_page, &self.page_size]
    }

    fn make_request(&self) -> Result<TransportRequest> {
        let page = integer("current_page", &self.current_page)?.to_string();
        let size = integer("page_size", &self.page_size)?.to_string();
        let url = self.descriptor().url(
            self.comm.parent().base_url(),
            &[
                ("type", self.entity_type.as_str()),
                ("page", &page),
                ("size", &size),
            ],
        )?;
        Ok(with_cookies(
            TransportRequest::new(self.descriptor().method, url),
            self.comm,
        ))
    }
}

/// Asks whether the logged-in Microsoft Live user is registered with the
/// Communities system.
#[derive(Debug, Clone)]
pub struct IsUserRegisteredRequest<'a> {
    comm: &'a CommunitiesClient,
}

impl<'a> IsUserRegisteredRequest<'a> {
    pub(crate) fn new(comm: &'a CommunitiesClient) -> Self {
        Self { comm }
    }
}

impl ApiRequest for IsUserRegisteredRequest<'_> {
    type Output = bool;

    fn descriptor(&self) -> &'static EndpointDescriptor {
        &catalog::IS_USER_REGISTERED
    }

    fn session(&self) -> &Client {
        self.comm.parent()
    }

    fn make_request(&self) -> Result<TransportRequest> {
        let url = self.descriptor().url(self.comm.parent().base_url(), &[])?;
        Ok(with_live_token(
            TransportRequest::new(self.descriptor().method, url),
            self.comm,
        ))
    }
}
