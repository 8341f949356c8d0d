//! Shared fixture: one complete EDMX document exercising tables, views,
//! doubled associations, custom schemas and a function import.

pub const FIXTURE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="3.0" xmlns:edmx="http://schemas.microsoft.com/ado/2009/11/edmx">
  <edmx:Runtime>
    <edmx:StorageModels>
      <Schema Namespace="Store" Provider="System.Data.SqlClient">
        <EntityType Name="customer">
          <Key><PropertyRef Name="id" /></Key>
          <Property Name="id" Type="int" Nullable="false" StoreGeneratedPattern="Identity" />
          <Property Name="customer_name" Type="nvarchar" MaxLength="80" Nullable="false" />
        </EntityType>
        <EntityType Name="order">
          <Key><PropertyRef Name="id" /></Key>
          <Property Name="id" Type="int" Nullable="false" StoreGeneratedPattern="Identity" />
          <Property Name="billing_customer_id" Type="int" Nullable="false" />
          <Property Name="shipping_customer_id" Type="int" />
          <Property Name="total" Type="decimal" Precision="18" Scale="2" Nullable="false" />
        </EntityType>
        <EntityType Name="vw_ActiveUsers">
          <Property Name="id" Type="int" Nullable="false" />
          <Property Name="login_name" Type="nvarchar" MaxLength="40" Nullable="false" />
        </EntityType>
        <Association Name="FK_order_customer_billing">
          <End Role="customer" Type="Store.customer" Multiplicity="1" />
          <End Role="order" Type="Store.order" Multiplicity="*" />
          <ReferentialConstraint>
            <Principal Role="customer"><PropertyRef Name="id" /></Principal>
            <Dependent Role="order"><PropertyRef Name="billing_customer_id" /></Dependent>
          </ReferentialConstraint>
        </Association>
        <Association Name="FK_order_customer_shipping">
          <End Role="customer" Type="Store.customer" Multiplicity="1" />
          <End Role="order" Type="Store.order" Multiplicity="*" />
          <ReferentialConstraint>
            <Principal Role="customer"><PropertyRef Name="id" /></Principal>
            <Dependent Role="order"><PropertyRef Name="shipping_customer_id" /></Dependent>
          </ReferentialConstraint>
        </Association>
        <Function Name="usp_customer_balance" IsComposable="false" Schema="finance">
          <Parameter Name="customerId" Type="int" Mode="In" />
        </Function>
        <EntityContainer Name="StoreContainer">
          <EntitySet Name="customer" EntityType="Store.customer" Schema="dbo" store:Type="Tables" />
          <EntitySet Name="order" EntityType="Store.order" Schema="sales" store:Type="Tables" />
          <EntitySet Name="vw_ActiveUsers" EntityType="Store.vw_ActiveUsers" store:Type="Views" />
        </EntityContainer>
      </Schema>
    </edmx:StorageModels>
    <edmx:ConceptualModels>
      <Schema Namespace="Model">
        <EntityType Name="Customer">
          <Key><PropertyRef Name="Id" /></Key>
          <Property Name="Id" Type="Int32" Nullable="false" />
          <Property Name="Name" Type="String" MaxLength="80" Nullable="false" />
        </EntityType>
        <EntityType Name="Order">
          <Key><PropertyRef Name="Id" /></Key>
          <Property Name="Id" Type="Int32" Nullable="false" />
          <Property Name="BillingCustomerId" Type="Int32" Nullable="false" />
          <Property Name="ShippingCustomerId" Type="Int32" />
          <Property Name="Total" Type="Decimal" Precision="18" Scale="2" Nullable="false" />
        </EntityType>
        <EntityType Name="vw_ActiveUsers">
          <Key><PropertyRef Name="Id" /></Key>
          <Property Name="Id" Type="Int32" Nullable="false" />
          <Property Name="LoginName" Type="String" MaxLength="40" Nullable="false" />
        </EntityType>
        <ComplexType Name="usp_customer_balance_Result">
          <Property Name="Balance" Type="Decimal" Precision="18" Scale="2" Nullable="false" />
        </ComplexType>
        <Association Name="FK_order_customer_billing">
          <End Role="Customer" Type="Model.Customer" Multiplicity="1" />
          <End Role="Order" Type="Model.Order" Multiplicity="*" />
        </Association>
        <Association Name="FK_order_customer_shipping">
          <End Role="Customer" Type="Model.Customer" Multiplicity="1" />
          <End Role="Order" Type="Model.Order" Multiplicity="*" />
        </Association>
        <EntityContainer Name="ModelContainer">
          <FunctionImport Name="usp_customer_balance" ReturnType="Collection(Model.usp_customer_balance_Result)">
            <Parameter Name="customerId" Mode="In" Type="Int32" />
          </FunctionImport>
        </EntityContainer>
      </Schema>
    </edmx:ConceptualModels>
    <edmx:Mappings>
      <Mapping Space="C-S">
        <EntityContainerMapping StorageEntityContainer="StoreContainer" CdmEntityContainer="ModelContainer">
          <EntitySetMapping Name="Customers">
            <EntityTypeMapping TypeName="Model.Customer">
              <MappingFragment StoreEntitySet="customer">
                <ScalarProperty Name="Id" ColumnName="id" />
                <ScalarProperty Name="Name" ColumnName="customer_name" />
              </MappingFragment>
            </EntityTypeMapping>
          </EntitySetMapping>
          <EntitySetMapping Name="Orders">
            <EntityTypeMapping TypeName="Model.Order">
              <MappingFragment StoreEntitySet="order">
                <ScalarProperty Name="Id" ColumnName="id" />
                <ScalarProperty Name="BillingCustomerId" ColumnName="billing_customer_id" />
                <ScalarProperty Name="ShippingCustomerId" ColumnName="shipping_customer_id" />
                <ScalarProperty Name="Total" ColumnName="total" />
              </MappingFragment>
            </EntityTypeMapping>
          </EntitySetMapping>
          <EntitySetMapping Name="ActiveUsers">
            <EntityTypeMapping TypeName="Model.vw_ActiveUsers">
              <MappingFragment StoreEntitySet="vw_ActiveUsers">
                <ScalarProperty Name="Id" ColumnName="id" />
                <ScalarProperty Name="LoginName" ColumnName="login_name" />
              </MappingFragment>
            </EntityTypeMapping>
          </EntitySetMapping>
        </EntityContainerMapping>
      </Mapping>
    </edmx:Mappings>
  </edmx:Runtime>
</edmx:Edmx>"#;
