//! Descriptors shipped with the client and the typed configuration each
//! plugin reads from them.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::plugins::PluginDescriptor;

const PLUG_ICON: &str = "mdi-power-plug";

pub const DOCUMENT_FIELD_LIST: &str = "Document field list";
pub const EXPORT_PAYMENT_ORDER: &str = "Export payment order";
pub const INVOICE_DETAILS: &str = "Invoice Details";
pub const SQLITE_EXTRACTION: &str = "Extraction PDF → SQLite";

/// Shows the first few index fields of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFieldListConfig {
    pub fields_to_show: usize,
}

/// Maps payment-order attributes to document field codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPaymentOrderConfig {
    pub payment_order_number_field_code: String,
    pub payment_order_date_field_code: String,
    pub payment_order_debitor_account_number_field_code: String,
    pub payment_order_debitor_name_field_code: String,
    pub payment_order_total_amount_field_code: String,
    pub payment_order_currency_field_code: String,
    pub payment_order_payment_date_field_code: String,
    pub payment_order_creditor_name_field_code: String,
    pub payment_order_creditor_address_field_code: String,
    pub payment_order_creditor_bank_account_field_code: String,
    #[serde(rename = "paymentOrderCreditorSWIFTFieldCode")]
    pub payment_order_creditor_swift_field_code: String,
    #[serde(rename = "paymentOrderIntermediarySWIFTFieldCode")]
    pub payment_order_intermediary_swift_field_code: String,
    /// `%URL%` means the document link.
    pub payment_order_reference_field_code: String,
}

/// Reads invoice line details from a conciliation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetailsConfig {
    pub db_table_name: String,
}

/// Extracts statement tables from PDFs into a SQLite content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqliteExtractionConfig {
    pub name: String,
    pub content_type: String,
    pub accept_mime: Vec<String>,
    pub default_columns: Vec<String>,
}

impl SqliteExtractionConfig {
    #[must_use]
    pub fn accepts(&self, mime: &str) -> bool {
        self.accept_mime.iter().any(|m| m.eq_ignore_ascii_case(mime))
    }
}

#[must_use]
pub fn document_field_list() -> PluginDescriptor {
    PluginDescriptor::new(DOCUMENT_FIELD_LIST, PLUG_ICON, json!({ "fieldsToShow": 4 }))
}

#[must_use]
pub fn export_payment_order() -> PluginDescriptor {
    PluginDescriptor::new(
        EXPORT_PAYMENT_ORDER,
        PLUG_ICON,
        json!({
            "paymentOrderNumberFieldCode": "PO_CaseNr",
            "paymentOrderDateFieldCode": "PO_Date",
            "paymentOrderDebitorAccountNumberFieldCode": "PO_AccountNr",
            "paymentOrderDebitorNameFieldCode": "PO_Client",
            "paymentOrderTotalAmountFieldCode": "PO_Amount",
            "paymentOrderCurrencyFieldCode": "PO_Currency",
            "paymentOrderPaymentDateFieldCode": "PO_PaymentDate",
            "paymentOrderCreditorNameFieldCode": "PO_Beneficiary",
            "paymentOrderCreditorAddressFieldCode": "PO_BeneficiaryAd",
            "paymentOrderCreditorBankAccountFieldCode": "PO_BeneficiaryIBAN",
            "paymentOrderCreditorSWIFTFieldCode": "PO_BeneficiarySWIFT",
            "paymentOrderIntermediarySWIFTFieldCode": "PO_IntermediarySWIFT",
            "paymentOrderReferenceFieldCode": "%URL%"
        }),
    )
}

#[must_use]
pub fn invoice_details() -> PluginDescriptor {
    PluginDescriptor::new(
        INVOICE_DETAILS,
        PLUG_ICON,
        json!({ "dbTableName": "InvoiceDetails" }),
    )
}

#[must_use]
pub fn sqlite_extraction() -> PluginDescriptor {
    PluginDescriptor::new(
        SQLITE_EXTRACTION,
        "file-import",
        json!({
            "name": "Extraction vers SQLite",
            "contentType": "SqliteFile v1.0",
            "acceptMime": ["application/pdf"],
            "defaultColumns": ["Fecha", "Descripción", "Importe"]
        }),
    )
}

/// All built-in descriptors.
#[must_use]
pub fn all() -> Vec<PluginDescriptor> {
    vec![
        document_field_list(),
        export_payment_order(),
        invoice_details(),
        sqlite_extraction(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_decode_into_their_configs() {
        let fields: DocumentFieldListConfig = document_field_list().config().unwrap();
        assert_eq!(fields.fields_to_show, 4);

        let po: ExportPaymentOrderConfig = export_payment_order().config().unwrap();
        assert_eq!(po.payment_order_creditor_swift_field_code, "PO_BeneficiarySWIFT");
        assert_eq!(po.payment_order_reference_field_code, "%URL%");

        let invoice: InvoiceDetailsConfig = invoice_details().config().unwrap();
        assert_eq!(invoice.db_table_name, "InvoiceDetails");

        let sqlite: SqliteExtractionConfig = sqlite_extraction().config().unwrap();
        assert!(sqlite.accepts("application/PDF"));
        assert!(!sqlite.accepts("image/png"));
        assert_eq!(sqlite.default_columns.len(), 3);
    }

    #[test]
    fn test_icons() {
        assert_eq!(invoice_details().icon, PLUG_ICON);
        assert_eq!(sqlite_extraction().icon, "file-import");
    }
}
