#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoVesselPost {
    /// "/board" or "/entries/<key>"
    #[prost(string, tag = "1")]
    pub path: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub action: ::prost::alloc::string::String,
    /// Empty when the action doesn't use it.
    #[prost(string, tag = "3")]
    pub key: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub value: ::prost::alloc::string::String,
    /// Only set on leader announcements.
    #[prost(uint64, tag = "5")]
    pub epoch: u64,
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoVesselAck {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoClientSubmit {
    /// "/board" or "/entries/<key>"
    #[prost(string, tag = "1")]
    pub path: ::prost::alloc::string::String,
    /// "entry", and "delete" for entries.
    #[prost(map = "string, string", tag = "2")]
    pub fields:
        ::std::collections::HashMap<::prost::alloc::string::String, ::prost::alloc::string::String>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoClientSubmitReply {
    #[prost(oneof = "proto_client_submit_reply::Outcome", tags = "1, 2")]
    pub outcome: ::core::option::Option<proto_client_submit_reply::Outcome>,
}
/// Nested message and enum types in `ProtoClientSubmitReply`.
pub mod proto_client_submit_reply {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Outcome {
        /// This vessel leads and applied the write to this key.
        #[prost(uint64, tag = "1")]
        AppliedKey(u64),
        /// The leader accepted the write.
        #[prost(uint32, tag = "2")]
        ForwardedTo(u32),
    }
}
#[doc = r" Generated client implementations."]
pub mod grpc_vessel_client {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = " Vessels POST an envelope to each other. Which operation it carries is"]
    #[doc = " decided by `action`. Clients submit board forms."]
    pub struct GrpcVesselClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl GrpcVesselClient<tonic::transport::Channel> {
        #[doc = r" Attempt to create a new client by connecting to a given endpoint."]
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> GrpcVesselClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + HttpBody + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as HttpBody>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = tonic::client::Grpc::with_interceptor(inner, interceptor);
            Self { inner }
        }
        pub async fn post(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoVesselPost>,
        ) -> Result<tonic::Response<super::ProtoVesselAck>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/vessel.GrpcVessel/Post");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn submit(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoClientSubmit>,
        ) -> Result<tonic::Response<super::ProtoClientSubmitReply>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/vessel.GrpcVessel/Submit");
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
    impl<T: Clone> Clone for GrpcVesselClient<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }
    impl<T> std::fmt::Debug for GrpcVesselClient<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "GrpcVesselClient {{ ... }}")
        }
    }
}
#[doc = r" Generated server implementations."]
pub mod grpc_vessel_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with GrpcVesselServer."]
    #[async_trait]
    pub trait GrpcVessel: Send + Sync + 'static {
        async fn post(
            &self,
            request: tonic::Request<super::ProtoVesselPost>,
        ) -> Result<tonic::Response<super::ProtoVesselAck>, tonic::Status>;
        async fn submit(
            &self,
            request: tonic::Request<super::ProtoClientSubmit>,
        ) -> Result<tonic::Response<super::ProtoClientSubmitReply>, tonic::Status>;
    }
    #[doc = " Vessels POST an envelope to each other. Which operation it carries is"]
    #[doc = " decided by `action`. Clients submit board forms."]
    #[derive(Debug)]
    pub struct GrpcVesselServer<T: GrpcVessel> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: GrpcVessel> GrpcVesselServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for GrpcVesselServer<T>
    where
        T: GrpcVessel,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/vessel.GrpcVessel/Post" => {
                    #[allow(non_camel_case_types)]
                    struct PostSvc<T: GrpcVessel>(pub Arc<T>);
                    impl<T: GrpcVessel> tonic::server::UnaryService<super::ProtoVesselPost> for PostSvc<T> {
                        type Response = super::ProtoVesselAck;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoVesselPost>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).post(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = PostSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/vessel.GrpcVessel/Submit" => {
                    #[allow(non_camel_case_types)]
                    struct SubmitSvc<T: GrpcVessel>(pub Arc<T>);
                    impl<T: GrpcVessel> tonic::server::UnaryService<super::ProtoClientSubmit> for SubmitSvc<T> {
                        type Response = super::ProtoClientSubmitReply;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoClientSubmit>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).submit(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = SubmitSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: GrpcVessel> Clone for GrpcVesselServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: GrpcVessel> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: GrpcVessel> tonic::transport::NamedService for GrpcVesselServer<T> {
        const NAME: &'static str = "vessel.GrpcVessel";
    }
}
