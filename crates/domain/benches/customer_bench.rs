use common::{AggregateId, EmailAddress, Hash, PersonName};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    Aggregate, ChangeCustomerName, ConfirmCustomerEmailAddress, Customer, CustomerEvent,
    CustomerService, RegisterCustomer,
};
use event_store::InMemoryEventStore;

fn register(id: &AggregateId) -> RegisterCustomer {
    RegisterCustomer::new(
        id.clone(),
        EmailAddress::parse("a@x.com").unwrap(),
        Hash::new("H1").unwrap(),
        PersonName::new("Ann").unwrap(),
    )
}

fn long_history(len: usize) -> Vec<CustomerEvent> {
    let id = AggregateId::new("bench");
    let mut events = Customer::register(&register(&id));
    for i in 1..len {
        let name = PersonName::new(format!("Name {i}")).unwrap();
        events.push(CustomerEvent::name_changed(id.clone(), name));
    }
    events
}

fn bench_reconstitute(c: &mut Criterion) {
    let history = long_history(1_000);

    c.bench_function("domain/reconstitute_1000", |b| {
        b.iter(|| Customer::reconstitute(history.iter().cloned()).unwrap());
    });
}

fn bench_register(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("domain/register_customer", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = CustomerService::new(InMemoryEventStore::new());
                service
                    .register_customer(register(&AggregateId::generate()))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_full_command_cycle(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("domain/register_confirm_rename", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = CustomerService::new(InMemoryEventStore::new());
                let id = AggregateId::generate();
                service.register_customer(register(&id)).await.unwrap();
                service
                    .confirm_email_address(ConfirmCustomerEmailAddress::new(
                        id.clone(),
                        Hash::new("H1").unwrap(),
                    ))
                    .await
                    .unwrap();
                service
                    .change_name(ChangeCustomerName::new(
                        id,
                        PersonName::new("Annie").unwrap(),
                    ))
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_reconstitute,
    bench_register,
    bench_full_command_cycle
);
criterion_main!(benches);
