mod mocks;
