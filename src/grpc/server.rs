use std::str::FromStr;

use rust_decimal::Decimal;
use tonic::{Request, Response, Status};
use tracing::{debug, instrument};

use crate::domain::{AggregatorError, DistanceReport};
use crate::service::SharedAggregator;

use super::proto::aggregator_server::{Aggregator as AggregatorRpc, AggregatorServer};
use super::proto::{Ack, AggregateRequest};

/// Convert a domain error to a gRPC Status
pub fn aggregator_error_to_status(error: AggregatorError) -> Status {
    match error {
        AggregatorError::Validation(msg) => Status::invalid_argument(msg),
        AggregatorError::NotFound(obu_id) => {
            Status::not_found(format!("No aggregate found for OBU {}", obu_id))
        }
        AggregatorError::Store(msg) => Status::internal(msg),
    }
}

/// gRPC handler for the Aggregator service.
/// Handles Proto → Domain mapping and error conversion.
pub struct AggregatorGrpcServer {
    aggregator: SharedAggregator,
}

impl AggregatorGrpcServer {
    pub fn new(aggregator: SharedAggregator) -> Self {
        Self { aggregator }
    }

    /// Wrap into the tonic service ready to be added to a server
    pub fn into_service(self) -> AggregatorServer<Self> {
        AggregatorServer::new(self)
    }
}

/// Doubles go through their shortest decimal text, like JSON numbers do
fn to_domain_report(req: AggregateRequest) -> Result<DistanceReport, Status> {
    let value = Decimal::from_str(&req.value.to_string())
        .map_err(|_| Status::invalid_argument(format!("invalid distance value: {}", req.value)))?;

    Ok(DistanceReport::new(req.obu_id, value).with_unix(req.unix))
}

#[tonic::async_trait]
impl AggregatorRpc for AggregatorGrpcServer {
    #[instrument(
        name = "Aggregator",
        skip(self, request),
        fields(obu_id = request.get_ref().obu_id)
    )]
    async fn aggregator(
        &self,
        request: Request<AggregateRequest>,
    ) -> Result<Response<Ack>, Status> {
        let report = to_domain_report(request.into_inner())?;

        self.aggregator
            .aggregate_distance(report)
            .map_err(aggregator_error_to_status)?;

        debug!("Distance aggregated");
        Ok(Response::new(Ack {}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ObuId, RatePerUnit};
    use crate::service::{Aggregator, AggregatorService};
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use tonic::Code;

    fn server() -> (SharedAggregator, AggregatorGrpcServer) {
        let store = Arc::new(MemoryStore::new());
        let aggregator: SharedAggregator =
            Arc::new(AggregatorService::new(store, RatePerUnit::default()));
        (aggregator.clone(), AggregatorGrpcServer::new(aggregator))
    }

    fn request(obu_id: i64, value: f64) -> Request<AggregateRequest> {
        Request::new(AggregateRequest {
            obu_id,
            value,
            unix: 1700000000,
        })
    }

    #[tokio::test]
    async fn test_aggregate_over_grpc() {
        let (aggregator, server) = server();

        server.aggregator(request(1, 10.0)).await.unwrap();
        server.aggregator(request(1, 5.5)).await.unwrap();

        let invoice = aggregator.calculate_invoice(ObuId::from(1)).unwrap();
        assert_eq!(invoice.total_distance, dec!(15.5));
    }

    #[tokio::test]
    async fn test_negative_distance_is_invalid_argument() {
        let (aggregator, server) = server();

        let status = server.aggregator(request(1, -2.0)).await.unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument);
        assert!(aggregator.calculate_invoice(ObuId::from(1)).is_err());
    }

    #[tokio::test]
    async fn test_double_keeps_its_decimal_value() {
        let (aggregator, server) = server();

        server.aggregator(request(2, 0.1)).await.unwrap();
        server.aggregator(request(2, 0.2)).await.unwrap();

        let invoice = aggregator.calculate_invoice(ObuId::from(2)).unwrap();
        assert_eq!(invoice.total_distance, dec!(0.3));

        let status = server.aggregator(request(2, 0.0004)).await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_non_finite_distance_is_invalid_argument() {
        let (_, server) = server();

        let status = server.aggregator(request(1, f64::NAN)).await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);

        let status = server.aggregator(request(1, f64::INFINITY)).await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[test]
    fn test_error_to_status() {
        assert_eq!(
            aggregator_error_to_status(AggregatorError::validation("x")).code(),
            Code::InvalidArgument
        );
        assert_eq!(
            aggregator_error_to_status(AggregatorError::NotFound(ObuId::from(1))).code(),
            Code::NotFound
        );
        assert_eq!(
            aggregator_error_to_status(AggregatorError::store("x")).code(),
            Code::Internal
        );
    }
}
