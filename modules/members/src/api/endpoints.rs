use std::sync::Arc;

use async_trait::async_trait;
use http::header::LOCATION;
use http::{HeaderValue, Method};
use simple_encoding::{
    Data, Decodable, DecodeError, EmptyDecoder, IntegerDecoder, JsonContentDecoder,
    JsonContentEncoder, StructDecoder,
};
use simple_endpoints::{
    parse_parameters, DecodedRequest, Endpoint, EndpointError, NoBody, ParamKind, Request,
    RequestDecoder, Response, ResponseEncoder, RouteParams,
};
use tracing::info;

use crate::domain::store::MemberStore;
use crate::generated::member;

/// `POST /members`: accepts any member version, stores it as the latest one.
pub struct CreateMemberEndpoint {
    store: Arc<MemberStore>,
    decoder: RequestDecoder<(), (), member::All>,
    encoder: ResponseEncoder<member::All>,
}

impl CreateMemberEndpoint {
    pub fn new(store: Arc<MemberStore>, development: bool) -> Self {
        Self {
            store,
            decoder: RequestDecoder::new(
                EmptyDecoder,
                EmptyDecoder,
                JsonContentDecoder::new(member::all_decoders()),
            ),
            encoder: ResponseEncoder::new(
                JsonContentEncoder::new(member::all_encoders()).pretty(development),
            ),
        }
    }
}

#[async_trait]
impl Endpoint for CreateMemberEndpoint {
    type Params = ();
    type Query = ();
    type Body = member::All;
    type ResponseBody = member::All;

    fn does_match(&self, request: &Request) -> Option<RouteParams> {
        if request.method != Method::POST {
            return None;
        }
        parse_parameters(request.path(), "/members", &[])
    }

    fn request_decoder(&self) -> &RequestDecoder<(), (), member::All> {
        &self.decoder
    }

    fn response_encoder(&self) -> &ResponseEncoder<member::All> {
        &self.encoder
    }

    async fn handle(
        &self,
        request: DecodedRequest<(), (), member::All>,
    ) -> Result<Response<member::All>, EndpointError> {
        let (id, stored) = self.store.insert(request.body);
        info!(id, "member created");

        let location = HeaderValue::from_str(&format!("/members/{id}"))
            .map_err(|err| EndpointError::Internal(err.into()))?;
        Ok(Response::created(member::All::Version2(stored)).with_header(LOCATION, location))
    }
}

/// Route parameters of `GET /members/@id`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberParams {
    pub id: i64,
}

impl Decodable for MemberParams {
    fn decode(data: &Data<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: data.field("id")?.decode(&IntegerDecoder)?,
        })
    }
}

/// `GET /members/@id`: responds in whichever version `Accept` asks for.
pub struct GetMemberEndpoint {
    store: Arc<MemberStore>,
    decoder: RequestDecoder<MemberParams, (), ()>,
    encoder: ResponseEncoder<member::All>,
}

impl GetMemberEndpoint {
    pub fn new(store: Arc<MemberStore>, development: bool) -> Self {
        Self {
            store,
            decoder: RequestDecoder::new(StructDecoder::<MemberParams>::new(), EmptyDecoder, NoBody),
            encoder: ResponseEncoder::new(
                JsonContentEncoder::new(member::all_encoders()).pretty(development),
            ),
        }
    }
}

#[async_trait]
impl Endpoint for GetMemberEndpoint {
    type Params = MemberParams;
    type Query = ();
    type Body = ();
    type ResponseBody = member::All;

    fn does_match(&self, request: &Request) -> Option<RouteParams> {
        if request.method != Method::GET {
            return None;
        }
        parse_parameters(request.path(), "/members/@id", &[("id", ParamKind::Number)])
    }

    fn request_decoder(&self) -> &RequestDecoder<MemberParams, (), ()> {
        &self.decoder
    }

    fn response_encoder(&self) -> &ResponseEncoder<member::All> {
        &self.encoder
    }

    async fn handle(
        &self,
        request: DecodedRequest<MemberParams, (), ()>,
    ) -> Result<Response<member::All>, EndpointError> {
        let found = self.store.get(request.params.id)?;
        Ok(Response::ok(member::All::Version2(found)))
    }
}
